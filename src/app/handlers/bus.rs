// SPDX-License-Identifier: GPL-3.0-only

//! Bus connection lifecycle

use crate::app::state::{AppModel, BusStatus, Message};
use crate::constants::{timing, topics};
use crate::errors::TransportError;
use crate::messages::{OmniVisionConfRequest, OmniVisionConfResponse};
use crate::session::SyncState;
use crate::transport::BusClient;
use cosmic::Task;
use tracing::{error, info, warn};

impl AppModel {
    pub(crate) fn connect_bus(&mut self) -> Task<cosmic::Action<Message>> {
        let address = self
            .target
            .bus_address(&self.config.bus_host_prefix, self.config.bus_port);
        let node = self.node_name.clone();
        self.bus_status = BusStatus::Connecting;

        Task::perform(
            async move { BusClient::connect(&address, node).await },
            |result| cosmic::Action::App(Message::BusConnected(result)),
        )
    }

    pub(crate) fn handle_bus_connected(
        &mut self,
        result: Result<BusClient, TransportError>,
    ) -> Task<cosmic::Action<Message>> {
        let bus = match result {
            Ok(bus) => bus,
            Err(err) => {
                self.bus_status = BusStatus::Offline(err.to_string());
                // Startup retrieval cannot happen without a bus; the session reports the failure
                if self.session.sync_state() == SyncState::Pending {
                    warn!(error = %err, "Bus unavailable at startup");
                    return self.dispatch(crate::session::Event::ConfigRetrieved(Err(err)));
                }
                error!(error = %err, "Bus unavailable");
                return Task::none();
            }
        };

        for topic in self.topics.outbound() {
            if let Err(err) = bus.advertise(topic) {
                warn!(topic, error = %err, "Failed to advertise topic");
            }
        }

        info!(node = %bus.node_name(), "Connected to bus");
        self.bus = Some(bus.clone());
        self.bus_status = BusStatus::Connected;
        self.bus_epoch = self.bus_epoch.wrapping_add(1);

        if self.session.sync_state() != SyncState::Pending {
            return Task::none();
        }

        let request = OmniVisionConfRequest {
            request_node_name: self.node_name.clone(),
        };
        Task::perform(
            async move {
                bus.call::<_, OmniVisionConfResponse>(
                    topics::OMNI_VISION_CONF_SERVICE,
                    &request,
                    timing::CONFIG_REQUEST_TIMEOUT,
                )
                .await
            },
            |result| cosmic::Action::App(Message::ConfigRetrieved(result)),
        )
    }

    pub(crate) fn handle_bus_closed(&mut self) -> Task<cosmic::Action<Message>> {
        warn!("Lost connection to the bus");
        self.bus = None;
        self.bus_status = BusStatus::Offline(TransportError::Disconnected.to_string());
        Task::none()
    }
}
