use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// Listens for the service-wide shutdown notification.
///
/// Once the notification has been seen, `recv` returns immediately on every
/// later call.
#[derive(Debug)]
pub struct Shutdown {
    is_shutdown: bool,
    notify: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new(notify: broadcast::Receiver<()>) -> Shutdown {
        Shutdown {
            is_shutdown: false,
            notify,
        }
    }

    pub fn subscribe(notify_shutdown: &broadcast::Sender<()>) -> Shutdown {
        Shutdown::new(notify_shutdown.subscribe())
    }

    pub fn is_shutdown(&self) -> bool {
        self.is_shutdown
    }

    /// Non-blocking variant of `recv`: latches and returns true if the
    /// notification has already been sent.
    pub fn check(&mut self) -> bool {
        if !self.is_shutdown && !matches!(self.notify.try_recv(), Err(TryRecvError::Empty)) {
            self.is_shutdown = true;
        }
        self.is_shutdown
    }

    pub async fn recv(&mut self) {
        if self.is_shutdown {
            return;
        }
        // a closed channel means the service is going away as well
        let _ = self.notify.recv().await;
        self.is_shutdown = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn latches_after_first_signal() {
        let (notify_shutdown, _) = broadcast::channel(1);
        let mut shutdown = Shutdown::subscribe(&notify_shutdown);
        assert!(!shutdown.is_shutdown());
        notify_shutdown.send(()).unwrap();
        shutdown.recv().await;
        assert!(shutdown.is_shutdown());
        // no second message is needed
        shutdown.recv().await;
    }

    #[test]
    fn check_does_not_block() {
        let (notify_shutdown, _) = broadcast::channel(1);
        let mut shutdown = Shutdown::subscribe(&notify_shutdown);
        assert!(!shutdown.check());
        notify_shutdown.send(()).unwrap();
        assert!(shutdown.check());
        assert!(shutdown.check());
    }

    #[tokio::test]
    async fn dropped_sender_counts_as_shutdown() {
        let (notify_shutdown, _) = broadcast::channel::<()>(1);
        let mut shutdown = Shutdown::subscribe(&notify_shutdown);
        drop(notify_shutdown);
        shutdown.recv().await;
        assert!(shutdown.is_shutdown());
    }
}
