use std::sync::Arc;

use answers_core::{AnswerResult, QueueApi, QueueAttributes};
use dashmap::DashMap;
use tracing::{debug, warn};

/// 队列名 -> 队列地址 解析器
///
/// 每个发布者或 worker 持有自己的实例，缓存随实例存活。
/// 首次解析时先查询已有地址，查询失败再创建队列；并发的首次解析
/// 可能重复调用创建接口（底层创建是幂等的），但缓存只保留首个写入的地址。
pub struct QueueUrlResolver {
    api: Arc<dyn QueueApi>,
    attributes: QueueAttributes,
    urls: DashMap<String, String>,
}

impl QueueUrlResolver {
    pub fn new(api: Arc<dyn QueueApi>, attributes: QueueAttributes) -> Self {
        Self {
            api,
            attributes,
            urls: DashMap::new(),
        }
    }

    pub async fn resolve(&self, name: &str) -> AnswerResult<String> {
        if let Some(url) = self.urls.get(name) {
            return Ok(url.value().clone());
        }

        let url = match self.api.get_queue_url(name).await {
            Ok(url) => url,
            Err(lookup_err) => {
                debug!("查询队列地址失败，尝试创建队列 {}: {}", name, lookup_err);
                self.api
                    .create_queue(name, &self.attributes)
                    .await
                    .map_err(|create_err| {
                        warn!(
                            queue = name,
                            lookup_error = %lookup_err,
                            "创建队列失败: {}",
                            create_err
                        );
                        create_err
                    })?
            }
        };

        let cached = self.urls.entry(name.to_string()).or_insert(url);
        Ok(cached.value().clone())
    }

    /// 已缓存的地址，不触发解析
    pub fn cached(&self, name: &str) -> Option<String> {
        self.urls.get(name).map(|url| url.value().clone())
    }
}
