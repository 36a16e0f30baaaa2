// Document sources: the HTTP backend and the rate-limiting decorator around it.

pub mod http_source;
pub mod paced_source;
pub mod traits;
