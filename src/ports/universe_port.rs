//! Universe source port trait.

use crate::domain::error::SwingError;
use crate::domain::universe::Universe;

pub trait UniversePort {
    fn load_universe(&self) -> Result<Universe, SwingError>;
}
