//! Serial port transport
//!
//! Provides the link to a host controller (e.g. a TFT board) over USB or
//! RS-232.
//!
//! Supports:
//! - Port enumeration and host port discovery
//! - Baud rate configuration (8N1, no flow control)
//! - Short-timeout reads so an idle link reports "no line yet"

use super::{LineBuffer, LineSink, LineTransport};
use marlinsim_core::{ConnectionError, Error, FirmwareError, Result};
use std::io::{self, Read, Write};
use std::time::Duration;

/// Marker searched for in port descriptions during discovery
const HOST_PORT_MARKER: &str = "SERIAL";

/// Serial link parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialParams {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port: String,
    /// Baud rate (default 115200)
    pub baud_rate: u32,
    /// Read timeout; bounds how long an idle read blocks
    pub read_timeout: Duration,
}

impl SerialParams {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            read_timeout: Duration::from_millis(10),
        }
    }

    /// Set the read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

/// Information about an available serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Silicon Labs CP2102 USB to UART Bridge")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            manufacturer: None,
            vid: None,
            pid: None,
        }
    }

    /// Set manufacturer
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }

    /// Whether this port looks like the host's serial adapter
    pub fn is_host_candidate(&self) -> bool {
        self.description.contains(HOST_PORT_MARKER)
    }
}

/// List available serial ports on the system, sorted by name
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    match serialport::available_ports() {
        Ok(ports) => {
            let mut port_infos: Vec<SerialPortInfo> = ports
                .iter()
                .map(|port| {
                    let info = SerialPortInfo::new(&port.port_name, get_port_description(port));

                    match &port.port_type {
                        serialport::SerialPortType::UsbPort(usb_info) => {
                            let info = info.with_usb_ids(usb_info.vid, usb_info.pid);
                            match usb_info.manufacturer {
                                Some(ref mfg) => info.with_manufacturer(mfg),
                                None => info,
                            }
                        }
                        _ => info,
                    }
                })
                .collect();
            port_infos.sort_by(|a, b| a.port_name.cmp(&b.port_name));

            Ok(port_infos)
        }
        Err(e) => {
            tracing::error!("Failed to enumerate serial ports: {}", e);
            Err(ConnectionError::SerialError {
                reason: format!("Failed to enumerate ports: {}", e),
            }
            .into())
        }
    }
}

/// Pick the first port whose description mentions a serial adapter
pub fn find_host_port(ports: &[SerialPortInfo]) -> Option<&SerialPortInfo> {
    ports.iter().find(|port| port.is_host_candidate())
}

/// Get a user-friendly description for a port
fn get_port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Trait for serial port I/O operations
pub trait ReadWrite: Read + Write + Send {}
impl<T: Read + Write + Send> ReadWrite for T {}

/// Line transport over a real serial port
pub struct SerialTransport {
    port: Box<dyn ReadWrite>,
    name: String,
    buffer: LineBuffer,
    read_buf: [u8; 256],
}

impl SerialTransport {
    /// Open a serial port with the given parameters
    pub fn open(params: &SerialParams) -> Result<Self> {
        if params.baud_rate == 0 {
            return Err(ConnectionError::InvalidParameters {
                reason: "baud rate must be non-zero".to_string(),
            }
            .into());
        }

        let builder = serialport::new(&params.port, params.baud_rate)
            .timeout(params.read_timeout)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None);

        match builder.open_native() {
            Ok(port) => {
                tracing::info!("Opened {} at {} baud", params.port, params.baud_rate);
                Ok(Self::from_port(Box::new(port), params.port.clone()))
            }
            Err(e) => {
                tracing::warn!("Failed to open serial port {}: {}", params.port, e);
                Err(ConnectionError::FailedToOpen {
                    port: params.port.clone(),
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Wrap an already-open byte stream
    pub fn from_port(port: Box<dyn ReadWrite>, name: impl Into<String>) -> Self {
        Self {
            port,
            name: name.into(),
            buffer: LineBuffer::new(),
            read_buf: [0; 256],
        }
    }
}

impl LineSink for SerialTransport {
    fn send_line(&mut self, line: &str) -> Result<()> {
        let mut data = String::with_capacity(line.len() + 1);
        data.push_str(line);
        data.push('\n');
        self.port
            .write_all(data.as_bytes())
            .and_then(|_| self.port.flush())
            .map_err(|e| {
                Error::from(FirmwareError::ResponseNotSent {
                    line: line.to_string(),
                    reason: e.to_string(),
                })
            })
    }
}

impl LineTransport for SerialTransport {
    fn read_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.buffer.next_line() {
            return Ok(Some(line));
        }

        match self.port.read(&mut self.read_buf) {
            Ok(0) => Ok(None),
            Ok(n) => {
                self.buffer.push(&self.read_buf[..n]);
                Ok(self.buffer.next_line())
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(ConnectionError::ConnectionLost {
                reason: e.to_string(),
            }
            .into()),
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Byte stream that hands out one scripted chunk per read, then times out
    struct ScriptedPort {
        chunks: VecDeque<Vec<u8>>,
        written: Vec<u8>,
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Err(io::Error::new(io::ErrorKind::TimedOut, "timeout")),
            }
        }
    }

    impl Write for ScriptedPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_host_port_discovery() {
        let ports = vec![
            SerialPortInfo::new("/dev/ttyS0", "PCI Serial"),
            SerialPortInfo::new("/dev/ttyUSB0", "USB Silicon Labs CP2102 USB to UART Bridge"),
            SerialPortInfo::new("/dev/ttyUSB1", "USB Device USB-SERIAL CH340"),
        ];
        let found = find_host_port(&ports).map(|p| p.port_name.as_str());
        assert_eq!(found, Some("/dev/ttyUSB1"));
        assert_eq!(find_host_port(&ports[..2]), None);
        assert!(!ports[0].is_host_candidate());
    }

    #[test]
    fn test_zero_baud_rejected() {
        let result = SerialTransport::open(&SerialParams::new("/dev/null", 0));
        assert!(matches!(
            result,
            Err(Error::Connection(ConnectionError::InvalidParameters { .. }))
        ));
    }

    #[test]
    fn test_reads_reassemble_lines_and_timeout_is_idle() {
        let port = ScriptedPort {
            chunks: VecDeque::from(vec![b"M10".to_vec(), b"5\nG28\n".to_vec()]),
            written: Vec::new(),
        };
        let mut transport = SerialTransport::from_port(Box::new(port), "scripted");

        assert_eq!(transport.read_line().unwrap(), None);
        assert_eq!(transport.read_line().unwrap().as_deref(), Some("M105"));
        assert_eq!(transport.read_line().unwrap().as_deref(), Some("G28"));
        assert_eq!(transport.read_line().unwrap(), None);
        assert_eq!(transport.name(), "scripted");
        transport.send_line("ok").unwrap();
    }

    #[test]
    fn test_character_split_across_reads_is_preserved() {
        let bytes = "M106 é\n".as_bytes();
        let split = bytes.len() - 2;
        let port = ScriptedPort {
            chunks: VecDeque::from(vec![bytes[..split].to_vec(), bytes[split..].to_vec()]),
            written: Vec::new(),
        };
        let mut transport = SerialTransport::from_port(Box::new(port), "scripted");

        assert_eq!(transport.read_line().unwrap(), None);
        assert_eq!(transport.read_line().unwrap().as_deref(), Some("M106 é"));
    }
}
