// Remote collection API.
// Provides the transport seam, request builders, and payload types for a table resource.

pub mod endpoints;
pub mod transport;
pub mod types;

pub use endpoints::ResourceClient;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use types::*;
