//! 审计追踪领域层基础库（chronicle-domain）
//!
//! 将领域实体的生命周期变更（创建/更新/销毁）记录为不可变版本快照，
//! 并支持从快照重建（reify）历史状态：
//! - 事件分类（`event`）：可记录性判定、差异计算、元数据合并与载荷装配
//! - 属性与变更模型（`attribute` / `change_set`）
//! - 序列化（`serializer`）与差异适配（`diff_adapter`）
//! - 存储协议与版本行（`persist`）
//! - 类型注册表（`registry`）与重建（`reifier`）
//!
//! 本 crate 尽量保持与存储与实体框架实现解耦：脏值跟踪结果、请求上下文
//! 与持久化层均以接口或参数形式从外部传入，核心只做同步纯计算，仅存储
//! 插入是异步边界。
//!
//! 典型用法：
//! 1. 为实体类型实现 `entity::Trackable` 与 `reifier::Reifiable`；
//! 2. 按实体类型装配 `options::VersionOptions` 与 `registry::TypeRegistry`；
//! 3. 在保存/删除生命周期内构建对应的 `event::*Event` 并持久化其产出；
//! 4. 需要历史状态时用 `reifier::reify` 从版本行重建脱管实例。
//!
pub mod attribute;
pub mod change_set;
pub mod config;
pub mod context;
pub mod diff_adapter;
pub mod entity;
pub mod error;
pub mod event;
pub mod options;
pub mod persist;
pub mod registry;
pub mod reifier;
pub mod serializer;
