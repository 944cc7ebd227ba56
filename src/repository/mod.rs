// ==========================================
// 考勤表客户端 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 本地键值存储、班级本地缓存与远程存储的组合
// ==========================================

pub mod class_repository;
pub mod class_store;
pub mod error;
pub mod local_class_store;
pub mod local_storage;
pub mod remote_class_store;

pub use class_repository::{ClassRepository, LoadOutcome, LoadSource, SyncStatus};
pub use class_store::ClassStore;
pub use error::{RepositoryError, RepositoryResult};
pub use local_class_store::LocalClassStore;
pub use local_storage::LocalStorage;
pub use remote_class_store::RemoteClassStore;
