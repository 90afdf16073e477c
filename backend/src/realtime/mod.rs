pub mod rooms;
pub mod socket;
pub mod token;

pub use rooms::RoomManager;
pub use token::{Credential, CredentialError, CredentialSigner};
