//! notifications.rs
//!
//! Очередь уведомлений для интерфейса.
//!
//! Любой компонент публикует `Notice` через `Notifier::publish`, а слой отображения
//! получает события через `subscribe` (приёмник) или `listen` (обработчик в фоновой задаче).
//! Подписка живёт ровно столько, сколько живёт её владелец: `Subscription` и `Listener`
//! отписываются при `drop`.
//!
//! Уведомление снимается вручную (`dismiss`) или автоматически по таймауту.
//! `surface` решает, что показать пользователю для `ClientError`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::NotificationConfig;
use crate::error::{ApiError, ClientError};

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session expired. Please sign in again.";

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: Uuid,
    pub title: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: None,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn titled(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::new(message)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoticeEvent {
    Published(Notice),
    Dismissed(Uuid),
}

/// Что показать, если сервер не прислал собственного сообщения об ошибке.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Общий текст страницы, например "Failed to load screenings".
    Message(&'static str),
    /// "Request failed" / "500 Internal Server Error".
    Status,
    Silent,
}

#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

struct Inner {
    tx: broadcast::Sender<NoticeEvent>,
    active: Mutex<Vec<Notice>>,
    timeout: Duration,
}

impl Notifier {
    pub fn new(config: &NotificationConfig) -> Self {
        Self::with_timeout(config.timeout(), config.channel_capacity)
    }

    /// Нулевой `timeout` отключает автоматическое снятие уведомлений.
    pub fn with_timeout(timeout: Duration, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                tx,
                active: Mutex::new(Vec::new()),
                timeout,
            }),
        }
    }

    pub fn publish(&self, notice: Notice) -> Uuid {
        let id = notice.id;
        debug!("Notice published: {:?} {}", notice.title, notice.message);

        self.lock_active().push(notice.clone());
        // Ошибка означает только отсутствие подписчиков
        let _ = self.inner.tx.send(NoticeEvent::Published(notice));

        if !self.inner.timeout.is_zero() {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let notifier = self.clone();
                let timeout = self.inner.timeout;
                runtime.spawn(async move {
                    tokio::time::sleep(timeout).await;
                    notifier.dismiss(id);
                });
            }
        }

        id
    }

    pub fn notify(&self, message: impl Into<String>) -> Uuid {
        self.publish(Notice::new(message))
    }

    /// Возвращает `false`, если уведомление уже снято.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut active = self.lock_active();
            let before = active.len();
            active.retain(|n| n.id != id);
            active.len() != before
        };
        if removed {
            let _ = self.inner.tx.send(NoticeEvent::Dismissed(id));
        }
        removed
    }

    pub fn active(&self) -> Vec<Notice> {
        self.lock_active().clone()
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.inner.tx.subscribe(),
        }
    }

    /// Запускает обработчик событий в фоновой задаче. Требует активного runtime tokio.
    pub fn listen<F>(&self, mut handler: F) -> Listener
    where
        F: FnMut(NoticeEvent) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    event = subscription.recv() => match event {
                        Some(event) => handler(event),
                        None => break,
                    },
                }
            }
        });

        Listener { cancel, handle: Some(handle) }
    }

    /// Показывает ошибку по общим правилам клиента.
    ///
    /// Сообщение сервера (`detail`/`message`) показывается всегда, отменённые операции
    /// не показываются никогда, остальное решает `fallback`.
    pub fn surface(&self, err: &ClientError, fallback: Fallback) -> Option<Uuid> {
        if !err.is_cancelled() {
            warn!("Request failed: {}", err);
        }

        let notice = match err {
            ClientError::Cancelled => None,
            ClientError::SessionExpired => Some(Notice::new(SESSION_EXPIRED_MESSAGE)),
            ClientError::Api(api) if api.structured => {
                Some(Notice::titled(api.title.clone(), api.message.clone()))
            }
            ClientError::Api(api) => match fallback {
                Fallback::Message(text) => Some(Notice::new(text)),
                Fallback::Status => Some(Notice::titled(api.title.clone(), api.message.clone())),
                Fallback::Silent => None,
            },
            other => match fallback {
                Fallback::Message(text) => Some(Notice::new(text)),
                Fallback::Status => Some(Notice::titled(ApiError::DEFAULT_TITLE, other.to_string())),
                Fallback::Silent => None,
            },
        };

        notice.map(|n| self.publish(n))
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.inner.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub struct Subscription {
    rx: broadcast::Receiver<NoticeEvent>,
}

impl Subscription {
    /// `None`, когда все `Notifier` удалены.
    pub async fn recv(&mut self) -> Option<NoticeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Notice subscriber lagged, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<NoticeEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Notice subscriber lagged, {} events skipped", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}

/// Фоновый обработчик событий; останавливается при `drop`.
pub struct Listener {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Listener {
    pub async fn unsubscribe(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
