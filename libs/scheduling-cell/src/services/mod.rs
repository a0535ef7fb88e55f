pub mod appointments;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod conflict;
pub mod slots;

pub use appointments::AppointmentRepository;
pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use calendar::WorkingHoursPolicy;
