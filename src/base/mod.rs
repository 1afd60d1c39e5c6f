// 传输层抽象、统一响应信封与错误类型
pub mod envelope;
pub mod error;
pub mod transport;

pub use envelope::ApiResponse;
pub use error::{ApiError, ApiResult};
pub use transport::{ApiRequest, Method, Transport};
