pub mod actions;
pub mod dispatcher;
pub mod error;
pub mod rpc;
pub mod store;
pub mod transport;

pub use actions::{PendingAuthorization, PlatformManagerActions, GET_AUTHORIZATION};
pub use dispatcher::{BroadcastDispatcher, Dispatcher};
pub use error::{AuthorizationError, CallError};
pub use rpc::{MissingRpcTransport, RpcRequest, RpcTransport};
pub use store::{AuthorizationState, AuthorizationStore};
pub use transport::{endpoint_url, HttpRpcTransport};
