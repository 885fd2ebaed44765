// ==========================================
// 库存作业列表引擎 - 行展开状态
// ==========================================
// 只记录"哪些 uuid 处于展开",与过滤/分页无关；
// 已不在当前结果中的 uuid 保留无害,重新出现时恢复展开
// ==========================================

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct RowExpansionStore {
    expanded: HashSet<String>,
}

impl RowExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 切换展开状态,返回切换后是否展开
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// 视图卸载时清空
    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = RowExpansionStore::new();
        assert!(store.toggle("1"));
        assert!(store.is_expanded("1"));
        assert!(!store.toggle("1"));
        assert!(!store.is_expanded("1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_rows_are_independent() {
        let mut store = RowExpansionStore::new();
        store.toggle("1");
        store.toggle("2");
        store.toggle("1");
        assert!(!store.is_expanded("1"));
        assert!(store.is_expanded("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = RowExpansionStore::new();
        store.toggle("1");
        store.toggle("2");
        store.clear();
        assert!(store.is_empty());
    }
}
