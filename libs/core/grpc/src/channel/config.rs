use std::time::Duration;
use tonic::transport::Endpoint;

/// HTTP/2 PING settings that detect a dead connection while it is idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
  pub interval: Duration,
  /// How long to wait for a PING ack before closing the connection
  pub timeout: Duration,
  pub while_idle: bool,
}

impl Default for KeepAlive {
  fn default() -> Self {
    Self {
      interval: Duration::from_secs(30),
      timeout: Duration::from_secs(10),
      while_idle: true,
    }
  }
}

/// Transport settings for one channel
///
/// Every client built on the channel shares them, since all RPCs are
/// multiplexed over the same HTTP/2 connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
  pub connect_timeout: Duration,
  /// Deadline the transport puts on each RPC; `None` leaves it to the caller
  pub request_timeout: Option<Duration>,
  /// `None` disables keep-alive PINGs
  pub keep_alive: Option<KeepAlive>,
  pub tcp_nodelay: bool,
}

impl Default for ChannelConfig {
  fn default() -> Self {
    Self {
      connect_timeout: Duration::from_secs(5),
      request_timeout: Some(Duration::from_secs(30)),
      keep_alive: Some(KeepAlive::default()),
      tcp_nodelay: true,
    }
  }
}

impl ChannelConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
    self.connect_timeout = timeout;
    self
  }

  /// Set the transport deadline for individual RPCs
  ///
  /// # Example
  /// ```ignore
  /// let config = ChannelConfig::new()
  ///     .with_request_timeout(Duration::from_secs(120));
  /// ```
  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout = Some(timeout);
    self
  }

  pub fn without_request_timeout(mut self) -> Self {
    self.request_timeout = None;
    self
  }

  pub fn with_keep_alive(mut self, keep_alive: KeepAlive) -> Self {
    self.keep_alive = Some(keep_alive);
    self
  }

  pub fn without_keep_alive(mut self) -> Self {
    self.keep_alive = None;
    self
  }

  pub(crate) fn apply_to_endpoint(&self, endpoint: Endpoint) -> Endpoint {
    let mut endpoint = endpoint
      .connect_timeout(self.connect_timeout)
      .tcp_nodelay(self.tcp_nodelay);

    if let Some(timeout) = self.request_timeout {
      endpoint = endpoint.timeout(timeout);
    }

    match self.keep_alive {
      Some(keep_alive) => endpoint
        .http2_keep_alive_interval(keep_alive.interval)
        .keep_alive_timeout(keep_alive.timeout)
        .keep_alive_while_idle(keep_alive.while_idle)
        .tcp_keepalive(Some(keep_alive.interval)),
      None => endpoint.tcp_keepalive(None),
    }
  }
}
