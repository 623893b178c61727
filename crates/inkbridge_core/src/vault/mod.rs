//! Note-service collaborator: session contract and stdio transport.

pub mod session;
pub mod stdio;

pub use session::{PatchOperation, PatchTargetType, VaultError, VaultResult, VaultSession};
pub use stdio::StdioVaultSession;
