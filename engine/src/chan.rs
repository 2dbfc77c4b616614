use either::Either;
use log::debug;
use tokio::sync::{mpsc, oneshot};

/// Declares a message enum for a task's inbox. Requests listed under `with_response` carry a
/// oneshot channel for their reply, the rest are fire-and-forget.
#[macro_export]
macro_rules! proto {
    (
        $name:ident,
        with_response: { $($request:ident: $response:ty),* $(,)? },
        without_response: [$($message:ident),* $(,)?]
    ) => {
        pub enum $name {
            $($request($request, $crate::chan::OneshotTx<$response>),)*
            $($message($message),)*
        }

        $(
            impl $crate::chan::Request<$name> for $request {
                type Response = $response;

                fn wrap_with(self, channel: $crate::chan::OneshotTx<Self::Response>) -> $name {
                    $name::$request(self, channel)
                }
            }
        )*

        $(
            impl From<$message> for $name {
                fn from(message: $message) -> Self {
                    $name::$message(message)
                }
            }

            impl $crate::chan::RequestWithoutResponse<$name> for $message {}
        )*
    };
}

pub fn channel<T>() -> (Tx<T>, Rx<T>) {
    let (inner_tx, inner_rx) = mpsc::unbounded_channel();
    (Tx { inner: inner_tx }, Rx { inner: inner_rx })
}

pub struct Tx<T> {
    inner: mpsc::UnboundedSender<T>,
}

impl<T> Tx<T> {
    /// Sends a request and waits for its response. Returns `None` if the receiving task is gone.
    pub async fn try_send<R>(&self, request: R) -> Option<R::Response>
    where R: Request<T> {
        let (wrapped, response) = request.wrap();
        self.inner.send(wrapped).ok()?;
        match response {
            Either::Left(response) => Some(response),
            Either::Right(response_rx) => response_rx.recv().await,
        }
    }

    /// Queues a message without waiting. Returns whether the receiving task is still running.
    pub fn post<R>(&self, message: R) -> bool
    where R: RequestWithoutResponse<T> {
        self.inner.send(message.into()).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl<T> Clone for Tx<T> {
    fn clone(&self) -> Self {
        Tx {
            inner: self.inner.clone(),
        }
    }
}

pub struct Rx<T> {
    inner: mpsc::UnboundedReceiver<T>,
}

impl<T> Rx<T> {
    pub async fn recv(&mut self) -> Option<T> {
        self.inner.recv().await
    }
}

pub trait Request<T>: Sized {
    type Response;

    fn wrap(self) -> (T, Either<Self::Response, OneshotRx<Self::Response>>) {
        let (tx, rx) = oneshot();
        (self.wrap_with(tx), Either::Right(rx))
    }

    fn wrap_with(self, channel: OneshotTx<Self::Response>) -> T;
}

pub trait RequestWithoutResponse<T>: Into<T> {}

impl<T, U> Request<T> for U
where U: RequestWithoutResponse<T>
{
    type Response = ();

    fn wrap(self) -> (T, Either<Self::Response, OneshotRx<Self::Response>>) {
        (self.into(), Either::Left(()))
    }

    fn wrap_with(self, _channel: OneshotTx<Self::Response>) -> T {
        self.into()
    }
}

pub fn oneshot<T>() -> (OneshotTx<T>, OneshotRx<T>) {
    let (inner_tx, inner_rx) = oneshot::channel();
    (OneshotTx { inner: inner_tx }, OneshotRx { inner: inner_rx })
}

pub struct OneshotTx<T> {
    inner: oneshot::Sender<T>,
}

impl<T> OneshotTx<T> {
    /// Delivers the response. The requester may have been cancelled in the meantime, in which
    /// case the response is dropped.
    pub fn send(self, value: T) {
        if self.inner.send(value).is_err() {
            debug!("Dropping response, requester went away");
        }
    }
}

pub struct OneshotRx<T> {
    inner: oneshot::Receiver<T>,
}

impl<T> OneshotRx<T> {
    pub async fn recv(self) -> Option<T> {
        self.inner.await.ok()
    }
}
