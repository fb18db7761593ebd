//! CYW43439 WiFi link
//!
//! The link counts as up once the radio has joined and DHCP has handed out
//! an address.

use cyw43::JoinOptions;
use defmt::*;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use heapless::String;

use meridian_core::config::{ClockConfig, MAX_PASSWORD_LEN, MAX_SSID_LEN};
use meridian_core::traits::{LinkControl, LinkStatus};

const JOIN_TIMEOUT: Duration = Duration::from_secs(15);
const DHCP_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only view of the network stack
#[derive(Clone, Copy)]
pub struct StackStatus(pub Stack<'static>);

impl LinkStatus for StackStatus {
    fn is_link_up(&self) -> bool {
        self.0.is_link_up() && self.0.is_config_up()
    }
}

/// Station-mode WiFi that can rejoin its network
pub struct WifiLink {
    control: cyw43::Control<'static>,
    stack: Stack<'static>,
    ssid: String<MAX_SSID_LEN>,
    password: String<MAX_PASSWORD_LEN>,
}

impl WifiLink {
    pub fn new(control: cyw43::Control<'static>, stack: Stack<'static>, config: &ClockConfig) -> Self {
        Self {
            control,
            stack,
            ssid: config.wifi_ssid.clone(),
            password: config.wifi_password.clone(),
        }
    }
}

impl LinkStatus for WifiLink {
    fn is_link_up(&self) -> bool {
        StackStatus(self.stack).is_link_up()
    }
}

impl LinkControl for WifiLink {
    async fn reconnect(&mut self) -> bool {
        info!("Joining WiFi network '{}'", self.ssid.as_str());

        let options = if self.password.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(self.password.as_bytes())
        };

        match with_timeout(JOIN_TIMEOUT, self.control.join(&self.ssid, options)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("WiFi join failed with status {}", e.status);
                return false;
            }
            Err(_) => {
                warn!("WiFi join timed out");
                self.control.leave().await;
                return false;
            }
        }

        if with_timeout(DHCP_TIMEOUT, self.stack.wait_config_up())
            .await
            .is_err()
        {
            warn!("No DHCP lease");
            return false;
        }

        if let Some(config) = self.stack.config_v4() {
            info!("WiFi up, address {}", config.address);
        }
        true
    }
}
