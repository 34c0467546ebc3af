use std::future::Future;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait HealthService: Send + Sync + 'static {
    fn get_status(&self) -> impl Future<Output = HealthStatus> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    pub mail_api: bool,
}

#[cfg(feature = "mock")]
impl MockHealthService {
    pub fn with_get_status(mut self, status: HealthStatus) -> Self {
        self.expect_get_status()
            .returning(move || Box::pin(std::future::ready(status)));
        self
    }
}
