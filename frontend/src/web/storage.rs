//! LocalStorage 封装模块
//!
//! Token 与后端地址以原始字符串保存（不经过 JSON 编码），
//! 因此直接使用 `gloo_storage` 提供的底层 `Storage`。

use gloo_storage::Storage;

/// 本地存储操作封装
pub struct LocalStorage;

impl LocalStorage {
    /// 获取存储的字符串值
    ///
    /// 键不存在或发生错误时返回 `None`。
    pub fn get(key: &str) -> Option<String> {
        gloo_storage::LocalStorage::raw().get_item(key).ok()?
    }

    /// 设置存储值，返回是否成功
    pub fn set(key: &str, value: &str) -> bool {
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .is_ok()
    }

    /// 删除存储的键值对，返回是否成功
    pub fn delete(key: &str) -> bool {
        gloo_storage::LocalStorage::raw().remove_item(key).is_ok()
    }
}
