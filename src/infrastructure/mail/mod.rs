pub mod dispatcher;
pub mod hosted_api;
pub mod smtp;
pub mod templates;
pub mod transport;

pub use dispatcher::MailDispatcher;
pub use transport::{select_transport, ConfiguredTransports, MailTransport, TransportFactory, TransportKind};
