//! Inter-task communication channels
//!
//! Defines the static channels, signals and shared state used between the
//! thread-mode tasks and the high-priority interrupt executor.

use core::cell::RefCell;

use embassy_rp::pwm::PwmOutput;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use quill_core::executor::MoveOutcome;
use quill_core::motion::MotionCommand;
use quill_core::safety::KillFlag;
use quill_core::scheduler::ExecutionState;
use quill_core::state::Status;
use quill_drivers::pen::ServoPen;
use quill_hal_rp2040::StepTimer;
use quill_protocol::CoordinateRecord;

/// Pending records between listener and planner (producer blocks when full)
const COMMAND_QUEUE_SIZE: usize = 1;

/// Planned moves between planner and executor
pub const MOTION_QUEUE_SIZE: usize = 64;

/// Flow-control tokens waiting for the UART
const FLOW_QUEUE_SIZE: usize = 8;

/// Parsed coordinate records from the serial listener
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, CoordinateRecord, COMMAND_QUEUE_SIZE> =
    Channel::new();

/// Motion commands from the planner
pub static MOTION_CHANNEL: Channel<CriticalSectionRawMutex, MotionCommand, MOTION_QUEUE_SIZE> =
    Channel::new();

/// Scheduler state handed to the step-pulse task at move start
pub static ARM_SIGNAL: Signal<CriticalSectionRawMutex, ExecutionState> = Signal::new();

/// Move outcome (step-pulse task on completion, kill switch on abort)
pub static MOVE_SIGNAL: Signal<CriticalSectionRawMutex, MoveOutcome> = Signal::new();

/// Latest status for the display
pub static STATUS_SIGNAL: Signal<CriticalSectionRawMutex, Status> = Signal::new();

/// Flow-control bytes for the UART transmitter
pub static FLOW_CHANNEL: Channel<CriticalSectionRawMutex, u8, FLOW_QUEUE_SIZE> = Channel::new();

/// Emergency stop flag
pub static KILL_FLAG: KillFlag = KillFlag::new();

/// Step pulse generator
pub static STEP_TIMER: StepTimer = StepTimer::new();

/// Pen servo, shared by the executor and the kill switch
pub type PenServo = ServoPen<PwmOutput<'static>>;

static PEN: Mutex<CriticalSectionRawMutex, RefCell<Option<PenServo>>> =
    Mutex::new(RefCell::new(None));

/// Install the pen servo (once, at boot)
pub fn install_pen(pen: PenServo) {
    PEN.lock(|cell| *cell.borrow_mut() = Some(pen));
}

/// Run `f` on the pen servo, if installed
pub fn with_pen<R>(f: impl FnOnce(&mut PenServo) -> R) -> Option<R> {
    PEN.lock(|cell| cell.borrow_mut().as_mut().map(f))
}
