use crate::device_display::interface::{DeviceDisplay, DeviceDisplayEvent, SelectOption};
use crate::device_media::interface::MediaStream;
use crate::slot::Slot;
use std::error::Error;
use std::io::BufRead;
use std::sync::mpsc::{channel, Receiver};

/// Headless display. Prints the picker to stdout and reads commands from stdin:
/// `<1|2> <device id>`, `refresh` or `quit`.
pub struct DeviceDisplayConsole {
    options: [Vec<SelectOption>; 2],
    selected: [Option<String>; 2],
    bound: [Option<String>; 2],
    message: Option<String>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {
            options: [Vec::new(), Vec::new()],
            selected: [None, None],
            bound: [None, None],
            message: None,
        }
    }

    fn render_display(&self) {
        println!("┌──────────────────────────────────────");
        for slot in Slot::ALL {
            let index = slot.index();
            println!("│ {}", slot.select_id());
            if self.options[index].is_empty() {
                println!("│     (no cameras)");
            }
            for option in &self.options[index] {
                let marker = if self.selected[index].as_deref() == Some(option.value.as_str()) {
                    ">"
                } else {
                    " "
                };
                println!("│   {} {} [{}]", marker, option.text, option.value);
            }
            match &self.bound[index] {
                Some(stream) => println!("│ {}: {}", slot.video_id(), stream),
                None => println!("│ {}: (blank)", slot.video_id()),
            }
        }
        if let Some(message) = &self.message {
            println!("│ messages: {}", message);
        }
        println!("└──────────────────────────────────────");
    }
}

impl Default for DeviceDisplayConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn set_options(
        &mut self,
        slot: Slot,
        options: &[SelectOption],
        selected: Option<&str>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.options[slot.index()] = options.to_vec();
        self.selected[slot.index()] = selected.map(str::to_string);
        self.render_display();
        Ok(())
    }

    fn bind_video(
        &mut self,
        slot: Slot,
        stream: Option<MediaStream>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.bound[slot.index()] =
            stream.map(|stream| format!("{} from {}", stream.id(), stream.device_id()));
        self.render_display();
        Ok(())
    }

    fn show_message(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.message = Some(message.to_string());
        self.render_display();
        Ok(())
    }

    fn events(&self) -> Receiver<DeviceDisplayEvent> {
        let (tx, rx) = channel();

        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                match parse_command(&line) {
                    Some(event) => {
                        let close = event == DeviceDisplayEvent::CloseRequested;
                        if tx.send(event).is_err() || close {
                            break;
                        }
                    }
                    None => println!("usage: <1|2> <device id> | refresh | quit"),
                }
            }
        });

        rx
    }
}

fn parse_command(line: &str) -> Option<DeviceDisplayEvent> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "refresh" => Some(DeviceDisplayEvent::RefreshRequested),
        "quit" | "exit" => Some(DeviceDisplayEvent::CloseRequested),
        number => {
            let slot = number
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(Slot::from_index)?;
            let device_id = parts.next()?.to_string();
            Some(DeviceDisplayEvent::SelectionChanged { slot, device_id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            parse_command("2 camB"),
            Some(DeviceDisplayEvent::SelectionChanged {
                slot: Slot::Second,
                device_id: "camB".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_slot() {
        assert_eq!(parse_command("3 camB"), None);
        assert_eq!(parse_command("0 camB"), None);
        assert_eq!(parse_command("1"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            parse_command("refresh"),
            Some(DeviceDisplayEvent::RefreshRequested)
        );
        assert_eq!(parse_command("quit"), Some(DeviceDisplayEvent::CloseRequested));
    }
}
