use crate::error;
use crate::tag;

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use cancellation::CancellationToken;

use error::*;
use tag::NdefTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Unsupported,
    Disabled,
    Enabled,
}

/// Source of tags entering the field
pub trait TagDetector {
    type Tag: NdefTag;

    fn availability(&self) -> Availability;

    fn poll(&mut self) -> Result<Option<Self::Tag>, TagError>;
}

/// Routes discovered tags to the caller while started
pub struct ForegroundDispatch<TDetector>
where
    TDetector: TagDetector,
{
    detector: TDetector,
    active: bool,
    poll_interval: Duration,
}

impl<TDetector> ForegroundDispatch<TDetector>
where
    TDetector: TagDetector,
{
    pub fn new(detector: TDetector) -> Self {
        Self {
            detector,
            active: false,
            poll_interval: Duration::from_millis(100),
        }
    }

    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    pub fn get_poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn detector(&self) -> &TDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut TDetector {
        &mut self.detector
    }

    /// Becomes active only if NFC is enabled
    pub fn start(&mut self) -> Availability {
        let availability = self.detector.availability();

        match availability {
            Availability::Enabled => {
                self.active = true;
                log::debug!("foreground dispatch started");
            }
            Availability::Disabled => log::warn!("NFC is disabled"),
            Availability::Unsupported => log::warn!("device doesn't support NFC"),
        }

        availability
    }

    pub fn stop(&mut self) {
        if self.active {
            log::debug!("foreground dispatch stopped");
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Blocks until a tag is discovered; `None` once stopped or canceled
    pub fn next_tag(
        &mut self,
        ct: &CancellationToken,
    ) -> Result<Option<TDetector::Tag>, TagError> {
        while self.active && !ct.is_canceled() {
            if let Some(tag) = self.detector.poll()? {
                log::info!("tag discovered");
                return Ok(Some(tag));
            }

            thread::sleep(self.poll_interval);
        }

        Ok(None)
    }
}

/// Detector handing out queued tags
pub struct SimulatedDetector<T>
where
    T: NdefTag,
{
    availability: Availability,
    tags: VecDeque<T>,
}

impl<T> SimulatedDetector<T>
where
    T: NdefTag,
{
    pub fn new(availability: Availability) -> Self {
        Self {
            availability,
            tags: VecDeque::new(),
        }
    }

    pub fn set_availability(&mut self, availability: Availability) {
        self.availability = availability;
    }

    /// Queues a tag for the next poll
    pub fn present(&mut self, tag: T) {
        self.tags.push_back(tag);
    }
}

impl<T> TagDetector for SimulatedDetector<T>
where
    T: NdefTag,
{
    type Tag = T;

    fn availability(&self) -> Availability {
        self.availability
    }

    fn poll(&mut self) -> Result<Option<T>, TagError> {
        Ok(self.tags.pop_front())
    }
}
