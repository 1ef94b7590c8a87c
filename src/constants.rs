pub const RECURRING_PAYMENT_CREATED: &str = "RECURRING_PAYMENT_CREATED";
pub const RECURRING_PAYMENT_BOOKED: &str = "RECURRING_PAYMENT_BOOKED";
pub const BOOKING_RUN_COMPLETED: &str = "BOOKING_RUN_COMPLETED";
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const GROUP_TRANSACTION_ADDED: &str = "GROUP_TRANSACTION_ADDED";

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
