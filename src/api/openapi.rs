use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::models::{BookingFailureResponse, BookingRunResponse, CreateGroupRequest, ErrorResponse},
    core::{
        calendar::Interval,
        models::{
            audit::AppLog,
            group::{Group, GroupMember, Role},
            payment::Payment,
            recurring_payment::{NewRecurringPayment, RecurringPaymentDefinition},
            transaction::{GroupTransaction, NewGroupTransaction, TransactionKind},
        },
        money::MonetaryAmount,
        services::GroupBalances,
    },
};

struct TriggerSecurity;

impl Modify for TriggerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::run_scheduled_bookings,
        super::handlers::create_recurring_payment,
        super::handlers::get_recurring_payment,
        super::handlers::list_booked_payments,
        super::handlers::create_group,
        super::handlers::get_group,
        super::handlers::add_group_transaction,
        super::handlers::list_group_transactions,
        super::handlers::get_group_balances,
        super::handlers::get_app_logs
    ),
    components(schemas(
        MonetaryAmount,
        Interval,
        Role,
        GroupMember,
        Group,
        TransactionKind,
        GroupTransaction,
        NewGroupTransaction,
        GroupBalances,
        RecurringPaymentDefinition,
        NewRecurringPayment,
        Payment,
        BookingRunResponse,
        BookingFailureResponse,
        CreateGroupRequest,
        ErrorResponse,
        AppLog
    )),
    modifiers(&TriggerSecurity),
    info(
        title = "Household Ledger API",
        description = "Recurring payment booking and group balance ledger",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
