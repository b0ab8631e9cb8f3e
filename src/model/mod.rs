mod event;
mod generation;
mod rows;
mod species;
mod standing;

pub use event::*;
pub use generation::*;
pub use rows::*;
pub use species::*;
pub use standing::*;
