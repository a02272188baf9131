//! Counter demo driven by simulated client events.
//!
//! A button increments a label and a slider reports its position. The demo
//! plays the client's part and prints every message the server would send.
//!
//! Run with: cargo run -p pancake --example counter

use pancake::prelude::*;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let plate = Plate::new(PlateConfig::default().with_title("Counter"));
    plate.init_logging();

    plate
        .add_page(FnPage::new("Counter", |cx| {
            let row = cx.add(Row::spec())?;
            let count = row.add_named(Label::spec("0"), "count")?;
            let plus = row.add(ExclaimButton::spec("Plus one"))?;
            plus.set_clicked(move |_| {
                let next = count.value().as_i64().unwrap_or(0) + 1;
                count.set_value(json!(next));
            });

            let slider = cx.add(Slider::spec("Volume", 0, 10, Some(json!(3))))?;
            Slider::set_display(&slider, |value| format!("{} dB", value));
            Ok(())
        }))?;

    send(&plate.connect());

    let page = plate.page("Counter").ok_or("counter page missing")?;
    let plus = page.children()[0].children()[1].id().ok_or("button detached")?;
    let slider = page.children()[1].id().ok_or("slider detached")?;

    let client = [
        InboundEvent::new(plus, EventKind::Click, None),
        InboundEvent::new(plus, EventKind::Click, None),
        InboundEvent::new(slider, EventKind::ValueChanged, Some(json!("7"))),
    ];
    for event in client {
        let outcome = plate.handle(&event);
        tracing::info!(widget = %event.widget_id, kind = %event.event_type, ?outcome, "client event");
        for message in plate.poll() {
            send(&message);
        }
    }
    Ok(())
}

fn send(message: &RenderMessage) {
    match message.to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => tracing::error!(error = %err, "could not encode message"),
    }
}
