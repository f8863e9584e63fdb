/// Filesystem traversal used to discover chapter directories.
pub mod fs;
/// Streaming archive download over HTTP.
pub mod http;
