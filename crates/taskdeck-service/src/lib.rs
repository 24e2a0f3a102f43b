mod blocking;
mod http;
pub mod session;
mod traits;

pub use blocking::BlockingHttpService;
pub use http::{HttpService, DEFAULT_BASE_URL};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionContext, SessionStore};
pub use traits::{ApiResponse, ServiceError, TaskdeckApi};
