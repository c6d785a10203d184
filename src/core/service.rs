/// 长生命周期的后台组件
///
/// 名称用于日志和诊断输出。
pub trait Service {
    fn name(&self) -> &'static str;
}

#[cfg(test)]
#[path = "../../tests/unit/core/service.rs"]
mod tests;
