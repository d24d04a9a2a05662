pub use self::{cell::*, faction::*, grid::*};

pub(crate) mod cell;
pub(crate) mod faction;
pub(crate) mod grid;
