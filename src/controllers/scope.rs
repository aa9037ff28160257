use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ClientError;

/// Время жизни страницы.
///
/// Все загрузки страницы проходят через `run`. После `teardown` (или удаления страницы)
/// незавершённые запросы прерываются и возвращают `ClientError::Cancelled`,
/// поэтому их результат уже не попадает в состояние страницы.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

#[derive(Debug, Clone)]
pub struct TeardownHandle {
    token: CancellationToken,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        self.token.cancel();
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> TeardownHandle {
        TeardownHandle {
            token: self.token.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub async fn run<F, T>(&self, operation: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.token.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("View torn down, dropping in-flight request");
                Err(ClientError::Cancelled)
            }
            result = operation => result,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
