//! 审计追踪应用层（chronicle-application）
//!
//! 基于 chronicle-domain 的编排构件：
//! - `recorder`：在实体保存/删除生命周期内驱动事件分类并交存储层持久化
//! - `inmemory_version_store`：内存版 `VersionStore`，用于测试与内嵌场景
//!
pub mod error;
pub mod inmemory_version_store;
pub mod recorder;
