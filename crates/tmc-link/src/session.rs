//! `EngineSession` — the production [`EngineLink`] over a child process and
//! a blocking localhost socket.

use std::io::{BufRead, BufReader, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::process::{Child, Command as ProcessCommand, Stdio};
use std::thread;
use std::time::Duration;

use log::{debug, info};
use serde_json::Value;

use tmc_core::{LaneId, RouteId, VehicleClass, VehicleId};

use crate::protocol::{Command, Request, Response};
use crate::{EngineConfig, EngineLink, LinkError, LinkResult};

/// How long to keep retrying the control port while the engine boots.
const CONNECT_ATTEMPTS: u32 = 50;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Grace period for the engine to exit on its own after the socket drops
/// (quit-on-end) before it is killed.
const CLOSE_GRACE_POLLS: u32 = 20;
const CLOSE_POLL_DELAY: Duration = Duration::from_millis(50);

/// A live session with one engine instance.
///
/// Owns the child process (when this side launched it) and the control
/// socket.  Dropping the session closes it; [`close`][EngineSession::close]
/// may also be called explicitly any number of times.
pub struct EngineSession {
    /// The engine process, if this session launched it.  `attach` leaves the
    /// process to whoever started it.
    child: Option<Child>,

    /// Control socket.  `None` once the session is closed.
    io: Option<BufReader<TcpStream>>,

    /// Sequence id of the last request written.
    next_id: u64,

    closed: bool,
}

impl EngineSession {
    // ── Connection lifecycle ──────────────────────────────────────────────

    /// Launch the engine described by `config` and attach to its control
    /// port.
    ///
    /// Retries the port for a bounded period while the engine boots.  On
    /// connection failure the just-launched process is torn down before the
    /// error is returned.
    pub fn connect(config: &EngineConfig) -> LinkResult<EngineSession> {
        config.validate()?;

        let binary = config.binary_path();
        let child = ProcessCommand::new(&binary)
            .args(config.command_args())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| LinkError::Launch { path: binary, source })?;

        match Self::dial(config.port, CONNECT_ATTEMPTS) {
            Ok(stream) => {
                info!("connected to engine on port {}", config.port);
                Ok(Self {
                    child: Some(child),
                    io: Some(BufReader::new(stream)),
                    next_id: 0,
                    closed: false,
                })
            }
            Err(source) => {
                reap(child);
                Err(LinkError::Connect { port: config.port, source })
            }
        }
    }

    /// Attach to an engine that is already listening on `addr`, without
    /// launching anything.  The process is left running on close.
    pub fn attach(addr: SocketAddr) -> LinkResult<EngineSession> {
        let stream = TcpStream::connect(addr)
            .map_err(|source| LinkError::Connect { port: addr.port(), source })?;
        stream.set_nodelay(true)?;
        info!("attached to engine at {addr}");
        Ok(Self {
            child: None,
            io: Some(BufReader::new(stream)),
            next_id: 0,
            closed: false,
        })
    }

    fn dial(port: u16, attempts: u32) -> std::io::Result<TcpStream> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        let mut last_err = None;
        for attempt in 0..attempts {
            match TcpStream::connect(addr) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => {
                    last_err = Some(e);
                    if attempt + 1 < attempts {
                        thread::sleep(CONNECT_RETRY_DELAY);
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| std::io::Error::other("no connect attempts made")))
    }

    /// Best-effort teardown: drop the socket, give a launched engine a grace
    /// period to exit on its own (quit-on-end), then kill and reap it.
    ///
    /// Safe to call repeatedly and after any failure; never returns an error.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // EOF on the control socket is the engine's signal to finish.
        self.io = None;

        if let Some(mut child) = self.child.take() {
            for _ in 0..CLOSE_GRACE_POLLS {
                match child.try_wait() {
                    Ok(Some(status)) => {
                        debug!("engine exited with {status}");
                        return;
                    }
                    Ok(None) => thread::sleep(CLOSE_POLL_DELAY),
                    Err(_) => break,
                }
            }
            let _ = child.kill();
            let _ = child.wait();
            debug!("engine did not exit in time and was killed");
        }
    }

    /// `true` once [`close`][EngineSession::close] has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ── Round-trip ────────────────────────────────────────────────────────

    /// Write one request line, read one response line, and unwrap the
    /// engine's answer.
    fn request(&mut self, command: Command) -> LinkResult<Value> {
        let io = self.io.as_mut().ok_or(LinkError::Closed)?;
        let name = command.name();

        self.next_id += 1;
        let id = self.next_id;
        let mut line = serde_json::to_string(&Request { id, command })
            .map_err(|e| LinkError::Protocol(e.to_string()))?;
        line.push('\n');
        io.get_mut().write_all(line.as_bytes())?;

        let mut answer = String::new();
        if io.read_line(&mut answer)? == 0 {
            return Err(LinkError::Protocol(
                "engine closed the connection mid-session".into(),
            ));
        }
        let response: Response = serde_json::from_str(answer.trim_end())
            .map_err(|e| LinkError::Protocol(format!("unparseable response: {e}")))?;

        if response.id != id {
            return Err(LinkError::Protocol(format!(
                "response id {} does not match request id {id}",
                response.id,
            )));
        }
        if !response.ok {
            return Err(LinkError::Engine {
                command: name,
                message: response.error.unwrap_or_else(|| "unspecified error".into()),
            });
        }
        Ok(response.data)
    }

    fn string_list(&mut self, command: Command) -> LinkResult<Vec<String>> {
        let name = command.name();
        let data = self.request(command)?;
        serde_json::from_value(data)
            .map_err(|e| LinkError::Protocol(format!("{name} payload: {e}")))
    }
}

fn reap(mut child: Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.close();
    }
}

// ── EngineLink implementation ─────────────────────────────────────────────────

impl EngineLink for EngineSession {
    fn advance(&mut self) -> LinkResult<()> {
        self.request(Command::Advance).map(|_| ())
    }

    fn lane_exists(&mut self, lane: &LaneId) -> LinkResult<bool> {
        let lanes = self.string_list(Command::GetLaneList)?;
        let wanted = lane.to_string();
        Ok(lanes.iter().any(|l| *l == wanted))
    }

    fn list_vehicles(&mut self) -> LinkResult<Vec<VehicleId>> {
        let ids = self.string_list(Command::GetAgentList)?;
        Ok(ids.into_iter().map(VehicleId::new).collect())
    }

    fn vehicle_route(&mut self, vehicle: &VehicleId) -> LinkResult<RouteId> {
        let data = self.request(Command::GetAgentRoute {
            agent: vehicle.as_str().to_owned(),
        })?;
        let route: String = serde_json::from_value(data)
            .map_err(|e| LinkError::Protocol(format!("get-agent-route payload: {e}")))?;
        Ok(RouteId::new(route))
    }

    fn set_lane_speed(&mut self, lane: &LaneId, speed: f64) -> LinkResult<()> {
        self.request(Command::SetLaneSpeed { lane: lane.to_string(), speed })
            .map(|_| ())
    }

    fn set_lane_allowed(&mut self, lane: &LaneId, classes: &[VehicleClass]) -> LinkResult<()> {
        self.request(Command::SetLaneAllowedClasses {
            lane:    lane.to_string(),
            classes: classes.iter().map(|c| c.as_str()).collect(),
        })
        .map(|_| ())
    }

    fn request_reroute(&mut self, vehicle: &VehicleId) -> LinkResult<()> {
        self.request(Command::RequestReroute {
            agent: vehicle.as_str().to_owned(),
        })
        .map(|_| ())
    }

    fn close(&mut self) {
        EngineSession::close(self);
    }
}
