pub mod article;
pub mod category;
pub mod dashboard;
pub mod query;
pub mod resource;
pub mod stats;
pub mod tag;

pub use article::ArticleService;
pub use category::CategoryService;
pub use dashboard::DashboardService;
pub use resource::ResourceClient;
pub use tag::TagService;
