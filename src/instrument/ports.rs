use serialport::SerialPortType;

/// A serial port that could host the load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    /// Device path or name, e.g. `/dev/ttyACM0` or `COM3`
    pub device: String,
    /// Human readable description
    pub description: String,
}

/// List serial ports visible to the OS, sorted by device name.
pub fn available_ports() -> Result<Vec<PortEntry>, serialport::Error> {
    let mut entries: Vec<PortEntry> = serialport::available_ports()?
        .into_iter()
        .map(|port| {
            let description = match port.port_type {
                SerialPortType::UsbPort(info) => {
                    let parts: Vec<String> = [info.manufacturer, info.product]
                        .into_iter()
                        .flatten()
                        .collect();
                    if parts.is_empty() {
                        "USB Serial".to_string()
                    } else {
                        parts.join(" ")
                    }
                }
                SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                SerialPortType::PciPort => "PCI".to_string(),
                SerialPortType::Unknown => "n/a".to_string(),
            };
            PortEntry {
                device: port.port_name,
                description,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.device.cmp(&b.device));
    Ok(entries)
}
