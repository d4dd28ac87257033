//! Client-assertion signing and bearer token models.

pub mod assertion;
pub mod key;
pub mod token {
	//! Bearer tokens minted by the token endpoint and the redacting secret wrapper.

	pub mod bearer;
	pub mod secret;
}

pub use assertion::*;
pub use key::*;
pub use token::{bearer::*, secret::*};
