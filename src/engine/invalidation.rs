// ==========================================
// 库存作业列表引擎 - 缓存失效广播
// ==========================================
// 职责: 单一共享资源；失效请求广播到所有订阅者,
//       订阅者按自身缓存键做前缀/子串匹配后决定是否重新拉取
// 约束: 失效幂等；同一订阅者积压的多次匹配合并为一次
// ==========================================

use crate::engine::events::CacheInvalidator;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// 广播缓冲容量
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// 缓存键是否被某个失效前缀命中
pub fn key_matches(cache_key: &str, resource_path_prefix: &str) -> bool {
    !resource_path_prefix.is_empty()
        && (cache_key.starts_with(resource_path_prefix) || cache_key.contains(resource_path_prefix))
}

// ==========================================
// InvalidationBus - 失效广播总线
// ==========================================
#[derive(Debug, Clone)]
pub struct InvalidationBus {
    sender: broadcast::Sender<String>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 新建订阅（只接收订阅之后的失效）
    pub fn subscribe(&self) -> InvalidationSubscription {
        InvalidationSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheInvalidator for InvalidationBus {
    fn invalidate(&self, resource_path_prefix: &str) {
        match self.sender.send(resource_path_prefix.to_string()) {
            Ok(receivers) => {
                tracing::debug!(prefix = resource_path_prefix, receivers, "缓存失效已广播");
            }
            Err(_) => {
                tracing::debug!(prefix = resource_path_prefix, "缓存失效: 当前无订阅者");
            }
        }
    }
}

// ==========================================
// InvalidationSubscription - 订阅端
// ==========================================
#[derive(Debug)]
pub struct InvalidationSubscription {
    receiver: broadcast::Receiver<String>,
}

impl InvalidationSubscription {
    /// 非阻塞地取空积压,返回是否有任一失效命中 `cache_key`
    ///
    /// 积压溢出(lagged)时无法确认丢失的内容,按命中处理
    pub fn drain_matches(&mut self, cache_key: &str) -> bool {
        let mut matched = false;
        loop {
            match self.receiver.try_recv() {
                Ok(prefix) => {
                    if key_matches(cache_key, &prefix) {
                        matched = true;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "失效订阅积压溢出,按命中处理");
                    matched = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        matched
    }

    /// 等待下一次命中 `cache_key` 的失效；总线关闭时返回 false
    pub async fn wait_for_match(&mut self, cache_key: &str) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(prefix) if key_matches(cache_key, &prefix) => return true,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "失效订阅积压溢出,按命中处理");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "/ws/rest/v1/stockmanagement/stockoperation?v=full&limit=10&startIndex=0";

    #[test]
    fn test_key_matches_prefix_and_substring() {
        assert!(key_matches(KEY, "/ws/rest/v1/stockmanagement/stockoperation"));
        assert!(key_matches(KEY, "/stockmanagement/stockoperation"));
        assert!(!key_matches(KEY, "/stockmanagement/stockitem"));
        assert!(!key_matches(KEY, ""));
    }

    #[test]
    fn test_drain_coalesces_repeated_invalidations() {
        let bus = InvalidationBus::new();
        let mut sub = bus.subscribe();

        bus.invalidate("/stockmanagement/stockoperation");
        bus.invalidate("/stockmanagement/stockoperation");
        bus.invalidate("/stockmanagement/stockitem");

        assert!(sub.drain_matches(KEY));
        // 积压已取空
        assert!(!sub.drain_matches(KEY));
    }

    #[test]
    fn test_unrelated_invalidation_does_not_match() {
        let bus = InvalidationBus::new();
        let mut sub = bus.subscribe();
        bus.invalidate("/stockmanagement/stockitem");
        assert!(!sub.drain_matches(KEY));
    }

    #[test]
    fn test_invalidate_without_subscribers_is_harmless() {
        let bus = InvalidationBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        bus.invalidate("/stockmanagement/stockoperation");
    }

    #[test]
    fn test_lagged_subscription_counts_as_match() {
        let bus = InvalidationBus::with_capacity(1);
        let mut sub = bus.subscribe();
        bus.invalidate("/a");
        bus.invalidate("/b");
        bus.invalidate("/c");
        assert!(sub.drain_matches(KEY));
    }

    #[tokio::test]
    async fn test_wait_for_match_skips_unrelated() {
        let bus = InvalidationBus::new();
        let mut sub = bus.subscribe();
        bus.invalidate("/stockmanagement/stockitem");
        bus.invalidate("/stockmanagement/stockoperation");
        assert!(sub.wait_for_match(KEY).await);
    }

    #[tokio::test]
    async fn test_wait_for_match_returns_false_when_closed() {
        let bus = InvalidationBus::new();
        let mut sub = bus.subscribe();
        drop(bus);
        assert!(!sub.wait_for_match(KEY).await);
    }
}
