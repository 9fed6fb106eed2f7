//! 批量操作的选中集合

use std::collections::BTreeSet;

use tracing::debug;

/// 被选中的内容 ID
///
/// 只保存 ID；列表刷新后用 `reconcile` 去掉已经不存在的记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<i64>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 切换单条记录的选中状态，返回切换后是否选中
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// 选中当前列表中的全部记录
    pub fn select_all(&mut self, current: impl IntoIterator<Item = i64>) {
        self.ids = current.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// 当前列表非空且选中集合与之完全相同
    pub fn is_all_selected(&self, current: &[i64]) -> bool {
        !current.is_empty() && current.iter().copied().collect::<BTreeSet<_>>() == self.ids
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }

    /// 丢弃不在当前列表中的 ID，返回丢弃数量
    pub fn reconcile(&mut self, current: &[i64]) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| current.contains(id));
        let dropped = before - self.ids.len();
        if dropped > 0 {
            debug!("选中集合移除 {} 个已不存在的 ID", dropped);
        }
        dropped
    }
}
