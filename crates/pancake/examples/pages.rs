//! Three pages sharing a counter, with a line-based transport.
//!
//! Each stdin line is an inbound event such as
//! `{"widgetId": 4, "eventType": "onclick"}`; each outbound message is
//! printed as one JSON line.
//!
//! Run with: cargo run -p pancake --example pages

use pancake::prelude::*;
use serde_json::json;
use std::io::BufRead;

struct Sweet {
    name: &'static str,
    next: &'static str,
    greed: i64,
}

impl Page for Sweet {
    fn name(&self) -> &str {
        self.name
    }

    fn decorate(&self, cx: &PageContext<'_>) -> ToppingResult<()> {
        let plate = cx.plate();
        let next = self.next;
        let button = cx.add(Button::spec(format!("I want to have a {}!", next.to_lowercase())))?;
        button.set_clicked(move |_| {
            plate.go_to(next);
        });
        Ok(())
    }

    fn show_up(&self, cx: &PageContext<'_>) {
        if let Some(greediness) = cx.cake().child("greediness") {
            let value = greediness.value().as_i64().unwrap_or(0);
            greediness.set_value(json!(value + self.greed));
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let plate = Plate::new(PlateConfig::default().with_title("Sweets"));
    plate.init_logging();

    let cake = plate.cake();
    cake.add(Label::spec("Greediness:"))?;
    cake.add_named(Label::spec("0"), "greediness")?;

    plate.add_page(Sweet { name: "Crape", next: "Waffle", greed: 1 })?;
    plate.add_page(Sweet { name: "Waffle", next: "Taiyaki", greed: 2 })?;
    plate.add_page(Sweet { name: "Taiyaki", next: "Crape", greed: 3 })?;

    println!("{}", plate.connect().to_json()?);
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match plate.handle_json(&line) {
            Ok(outcome) => tracing::debug!(?outcome, "event handled"),
            Err(err) => {
                tracing::warn!(error = %err, "bad client message");
                continue;
            }
        }
        for message in plate.poll() {
            println!("{}", message.to_json()?);
        }
    }
    Ok(())
}
