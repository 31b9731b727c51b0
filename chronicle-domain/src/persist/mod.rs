//! 持久化协议与版本行形态（persist）
//!
//! 定义版本记录的标准形态与存储层最小契约：
//! - 版本行（`VersionRecord`）：事件分类的产出，亦即存储行；
//! - 存储协议（`VersionStore`）：列内省与插入；
//! - 槽位画像（`SlotProfile`）：每实体类型一次内省的缓存单元。
//!
//! 该模块聚焦协议，具体存储后端由上层提供实现并注入。
//!
mod store;
mod version_record;

pub use store::{OBJECT_CHANGES_COLUMN, OBJECT_COLUMN, SlotProfile, VersionStore};
pub use version_record::VersionRecord;
