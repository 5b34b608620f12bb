/// Errors that can occur while talking to the electronic load
#[derive(Debug, thiserror::Error)]
pub enum InstrumentError {
    /// The serial port could not be opened
    #[error("Failed to open serial port {port}: {source}")]
    Connection {
        /// Port name as given on the command line
        port: String,
        /// Underlying serial error
        #[source]
        source: serialport::Error,
    },

    /// No response line arrived within the read timeout
    #[error("Timed out waiting for response to '{command}'")]
    Timeout {
        /// Query that went unanswered
        command: String,
    },

    /// Response could not be parsed as the expected value and unit
    #[error("Malformed response to '{command}': {response:?}")]
    MalformedResponse {
        /// Query that produced the response
        command: String,
        /// Raw response text (trimmed)
        response: String,
    },

    /// Mode query returned a token outside CV/CC/CR/CW
    #[error("Unknown instrument mode: {0:?}")]
    UnknownMode(String),

    /// I/O error on the serial line
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation attempted after the session was closed
    #[error("Instrument session is closed")]
    Closed,
}

impl InstrumentError {
    /// Whether this error is a protocol failure (timeout or unparseable reply)
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::MalformedResponse { .. } | Self::UnknownMode(_)
        )
    }
}
