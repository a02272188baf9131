//! Built-in widget kinds.
//!
//! - **Text widgets** - [`Label`], [`Text`], [`Paragraph`]
//! - **Controls** - [`Button`], [`Input`], [`Slider`], [`DictInput`]
//! - **Layout** - [`Row`], [`Column`], [`Card`], [`FloatingCard`]
//! - **Images** - [`ImageBox`], [`ImageCard`]
//! - **Dynamic construction** - [`ToolBox`]
//!
//! Every kind implements [`ToppingKind`](crate::ToppingKind) and offers a
//! typed `spec(..)` constructor; the same kinds are reachable by name through
//! [`ToppingRegistry::builtin`](crate::ToppingRegistry::builtin).

mod button;
mod card;
mod dict_input;
mod image_box;
mod input;
mod layout;
mod slider;
mod text;
mod toolbox;

pub use button::Button;
pub use card::{Card, FloatingCard, ImageCard};
pub use dict_input::{DictInput, DictView};
pub use image_box::{ImageBox, ImageFormat, ImageSource};
pub use input::{Input, InputType};
pub use layout::{Column, Root, Row};
pub use slider::{DisplayFn, Slider};
pub use text::{Label, Paragraph, Text};
pub use toolbox::ToolBox;

use crate::registry::ToppingRegistry;

/// Register every built-in kind except [`Root`], which only a tree creates.
pub fn register_builtin(registry: &mut ToppingRegistry) {
    registry
        .register::<Button>()
        .register::<Label>()
        .register::<Text>()
        .register::<Paragraph>()
        .register::<Input>()
        .register::<Slider>()
        .register::<DictInput>()
        .register::<Row>()
        .register::<Column>()
        .register::<Card>()
        .register::<FloatingCard>()
        .register::<ImageBox>()
        .register::<ImageCard>()
        .register::<ToolBox>();
}
