//! The polling cycle: frame in, per-button debounce, dispatch out.

use snespad_buttons::{ButtonId, NUM_BUTTONS};

use crate::debounce::{Debouncer, FiredEvent};
use crate::dispatch::{Dispatcher, KeycodeSink, LightPublisher};
use crate::sampler::FrameSource;

/// Drive the pipeline until the frame source reports shutdown.
///
/// Each frame is fed to every button's debouncer in frame bit order;
/// the machines are fully independent, so per-button fires are strictly
/// frame-ordered and buttons cannot interfere with each other.
pub fn run<S, P, K>(
    source: &mut S,
    debouncers: &mut [Debouncer; NUM_BUTTONS],
    dispatcher: &mut Dispatcher<P, K>,
) where
    S: FrameSource,
    P: LightPublisher,
    K: KeycodeSink,
{
    while let Some(frame) = source.read_frame() {
        for (button, debouncer) in ButtonId::ALL.into_iter().zip(debouncers.iter_mut()) {
            if debouncer.update(frame.pressed(button), frame.at()) {
                dispatcher.handle(&FiredEvent {
                    button,
                    at: frame.at(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Frame;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    struct ScriptedSource {
        frames: VecDeque<Frame>,
    }

    impl FrameSource for ScriptedSource {
        fn read_frame(&mut self) -> Option<Frame> {
            self.frames.pop_front()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPublisher {
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl LightPublisher for RecordingPublisher {
        fn publish(&mut self, topic: &str, payload: &str) {
            self.calls
                .lock()
                .unwrap()
                .push((topic.to_string(), payload.to_string()));
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        codes: Arc<Mutex<Vec<String>>>,
    }

    impl KeycodeSink for RecordingSink {
        fn send_keycode(&mut self, code: &str) {
            self.codes.lock().unwrap().push(code.to_string());
        }
    }

    /// Frames 10ms apart in which only the given buttons are held.
    fn frames(held_per_frame: &[&[ButtonId]]) -> VecDeque<Frame> {
        let start = Instant::now();
        held_per_frame
            .iter()
            .enumerate()
            .map(|(i, held)| {
                let mut pressed = [false; NUM_BUTTONS];
                for button in *held {
                    pressed[button.index()] = true;
                }
                Frame::from_pressed(pressed, start + Duration::from_millis(10) * i as u32)
            })
            .collect()
    }

    #[test]
    fn test_held_press_dispatches_once_and_loop_exits() {
        let held: &[ButtonId] = &[ButtonId::B];
        let mut source = ScriptedSource {
            frames: frames(&[held; 10]),
        };
        let mut debouncers: [Debouncer; NUM_BUTTONS] =
            std::array::from_fn(|_| Debouncer::with_thresholds(4, 4, Duration::from_secs(60)));
        let publisher = RecordingPublisher::default();
        let sink = RecordingSink::default();
        let mut dispatcher = Dispatcher::new(
            publisher.clone(),
            sink.clone(),
            ["home/light1".to_string(), "home/light2".to_string()],
        );

        run(&mut source, &mut debouncers, &mut dispatcher);

        assert_eq!(*sink.codes.lock().unwrap(), vec!["KEYCODE_BACK"]);
        assert!(publisher.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_buttons_fire_independently_within_a_frame() {
        // X and Up held together: one light toggle and one keycode, both
        // fired on the same frame.
        let held: &[ButtonId] = &[ButtonId::X, ButtonId::Up];
        let mut source = ScriptedSource {
            frames: frames(&[held; 6]),
        };
        let mut debouncers: [Debouncer; NUM_BUTTONS] =
            std::array::from_fn(|_| Debouncer::with_thresholds(4, 4, Duration::from_secs(60)));
        let publisher = RecordingPublisher::default();
        let sink = RecordingSink::default();
        let mut dispatcher = Dispatcher::new(
            publisher.clone(),
            sink.clone(),
            ["home/light1".to_string(), "home/light2".to_string()],
        );

        run(&mut source, &mut debouncers, &mut dispatcher);

        assert_eq!(
            *publisher.calls.lock().unwrap(),
            vec![("home/light1".to_string(), "ON".to_string())]
        );
        assert_eq!(*sink.codes.lock().unwrap(), vec!["KEYCODE_DPAD_UP"]);
    }

    #[test]
    fn test_sub_threshold_press_dispatches_nothing() {
        let held: &[ButtonId] = &[ButtonId::A];
        let none: &[ButtonId] = &[];
        let mut source = ScriptedSource {
            frames: frames(&[held, held, held, none, none, none]),
        };
        let mut debouncers: [Debouncer; NUM_BUTTONS] =
            std::array::from_fn(|_| Debouncer::with_thresholds(4, 4, Duration::from_secs(60)));
        let publisher = RecordingPublisher::default();
        let sink = RecordingSink::default();
        let mut dispatcher = Dispatcher::new(
            publisher.clone(),
            sink.clone(),
            ["home/light1".to_string(), "home/light2".to_string()],
        );

        run(&mut source, &mut debouncers, &mut dispatcher);

        assert!(publisher.calls.lock().unwrap().is_empty());
        assert!(sink.codes.lock().unwrap().is_empty());
    }
}
