//! WebSocket transport.
//!
//! [`connect`] builds the handshake request, performs the upgrade, and splits
//! the stream into a [`WsSink`] and a [`WsSource`]. Ping and pong frames are
//! answered by tungstenite itself and never surface to the session.

use std::sync::Arc;

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream,
    tungstenite::{
        self, Message,
        client::IntoClientRequest,
        http::{HeaderName, HeaderValue},
        protocol::{CloseFrame, frame::coding::CloseCode},
    },
};
use wsline_session::{
    ConnectRequest, Connector, FrameKind, FrameSink, FrameSource, InboundFrame, TransportError,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Close code reported when the peer's close frame had no status.
const NO_STATUS_RECEIVED: u16 = 1005;
/// Close code reported when the stream ended without a close frame.
const ABNORMAL_CLOSURE: u16 = 1006;

/// Transport configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportConfig {
    /// Accept any server certificate on `wss://`.
    ///
    /// WARNING: Development only.
    pub insecure: bool,
}

/// [`Connector`] dialing WebSocket URLs.
#[derive(Debug, Clone, Default)]
pub struct WsConnector {
    config: TransportConfig,
}

impl WsConnector {
    /// Create a connector.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

impl Connector for WsConnector {
    type Sink = WsSink;
    type Source = WsSource;

    async fn connect(&self, request: &ConnectRequest) -> Result<(WsSink, WsSource), TransportError> {
        connect(request, &self.config).await
    }
}

/// Write half of a WebSocket connection.
#[derive(Debug)]
pub struct WsSink {
    sink: SplitSink<WsStream, Message>,
}

impl FrameSink for WsSink {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::Stream(format!("send failed: {e}")))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let frame = CloseFrame { code: CloseCode::Normal, reason: "".into() };
        self.sink
            .send(Message::Close(Some(frame)))
            .await
            .map_err(|e| TransportError::Stream(format!("close failed: {e}")))
    }
}

/// Read half of a WebSocket connection.
#[derive(Debug)]
pub struct WsSource {
    stream: SplitStream<WsStream>,
}

impl FrameSource for WsSource {
    async fn recv(&mut self) -> Result<InboundFrame, TransportError> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => return Err(read_error(e)),
                None => {
                    return Err(TransportError::Closed {
                        code: ABNORMAL_CLOSURE,
                        reason: String::new(),
                    });
                },
            };

            if let Some(frame) = classify(message) {
                return frame;
            }
        }
    }
}

/// Map a received message to a session frame, or `None` for control traffic.
fn classify(message: Message) -> Option<Result<InboundFrame, TransportError>> {
    match message {
        Message::Text(text) => Some(Ok(InboundFrame::text(text))),
        Message::Binary(data) => Some(Ok(InboundFrame::binary(data))),
        Message::Ping(_) | Message::Pong(_) => {
            tracing::trace!("control frame");
            None
        },
        Message::Close(frame) => {
            let (code, reason) = frame.map_or((NO_STATUS_RECEIVED, String::new()), |frame| {
                (u16::from(frame.code), frame.reason.into_owned())
            });
            Some(Err(TransportError::Closed { code, reason }))
        },
        Message::Frame(frame) => {
            let kind = FrameKind::from_opcode(u8::from(frame.header().opcode));
            Some(Ok(InboundFrame { kind, payload: frame.into_data() }))
        },
    }
}

fn read_error(error: tungstenite::Error) -> TransportError {
    match error {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            TransportError::Closed { code: ABNORMAL_CLOSURE, reason: String::new() }
        },
        other => TransportError::Stream(format!("read failed: {other}")),
    }
}

/// Connect to a WebSocket URL.
///
/// `http://` and `https://` URLs are dialed as `ws://` and `wss://`. Every
/// request header is appended to the handshake, so repeated names are kept.
///
/// # Errors
///
/// [`TransportError::Connection`] if the URL or a header is malformed, or the
/// TCP, TLS, or WebSocket handshake fails.
pub async fn connect(
    request: &ConnectRequest,
    config: &TransportConfig,
) -> Result<(WsSink, WsSource), TransportError> {
    let url = http_to_ws_scheme(&request.url);
    let mut handshake = url
        .as_str()
        .into_client_request()
        .map_err(|e| TransportError::Connection(format!("invalid URL {url}: {e}")))?;

    for (name, value) in &request.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::Connection(format!("invalid header name {name}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::Connection(format!("invalid value for {name}: {e}")))?;
        handshake.headers_mut().append(header_name, header_value);
    }

    install_crypto_provider();
    let tls = if config.insecure {
        tracing::warn!("certificate verification disabled");
        Some(tokio_tungstenite::Connector::Rustls(Arc::new(insecure_tls_config())))
    } else {
        None
    };

    let (stream, response) =
        tokio_tungstenite::connect_async_tls_with_config(handshake, None, false, tls)
            .await
            .map_err(|e| TransportError::Connection(format!("{url}: {e}")))?;
    tracing::debug!(%url, status = %response.status(), "websocket handshake complete");

    let (sink, stream) = stream.split();
    Ok((WsSink { sink }, WsSource { stream }))
}

/// Convert an HTTP(S) URL to the WS(S) scheme.
///
/// Passes `ws://` and `wss://` (and anything else) through unchanged.
pub fn http_to_ws_scheme(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        url.to_string()
    }
}

/// Make ring the process-wide rustls provider if none is set yet.
fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        // Err means another thread installed one first
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}

/// TLS config that accepts any certificate.
fn insecure_tls_config() -> rustls::ClientConfig {
    rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(InsecureCertVerifier))
        .with_no_client_auth()
}

/// Certificate verifier that accepts any certificate.
#[derive(Debug)]
struct InsecureCertVerifier;

impl rustls::client::danger::ServerCertVerifier for InsecureCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
