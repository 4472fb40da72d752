use std::env;
use std::time::Duration;

use cancellation::CancellationTokenSource;

use ndef_tag::controller::NfcController;
use ndef_tag::dispatch::{Availability, ForegroundDispatch, SimulatedDetector};
use ndef_tag::memory_block_channel::MemoryBlockChannel;
use ndef_tag::session_builder::TagSessionBuilder;
use ndef_tag::type2_tag::Type2Tag;

type DemoTag = Type2Tag<MemoryBlockChannel>;

fn main() {
    simple_logger::init().unwrap();

    let message = env::args().nth(1).unwrap_or_else(|| "Hello".to_owned());

    let session = TagSessionBuilder::new()
        .set_status_listener(|x| println!("Display: {}", x))
        .finish()
        .unwrap();

    let mut controller = NfcController::new(session);
    controller.set_message(&message);

    let mut detector = SimulatedDetector::new(Availability::Enabled);
    detector.present(DemoTag::new(MemoryBlockChannel::ntag213()));

    let mut dispatch = ForegroundDispatch::new(detector);
    if dispatch.start() != Availability::Enabled {
        return;
    }

    // no tag in the field yet
    controller.write_pressed();

    match wait_for_tag(&mut dispatch) {
        Some(tag) => {
            controller.tag_discovered(tag);
            controller.read_pressed();
        }
        None => log::warn!("no tag discovered"),
    }

    dispatch.stop();
}

fn wait_for_tag(dispatch: &mut ForegroundDispatch<SimulatedDetector<DemoTag>>) -> Option<DemoTag> {
    let cts = CancellationTokenSource::new();
    cts.cancel_after(Duration::from_millis(1500));

    dispatch.next_tag(&cts).unwrap()
}
