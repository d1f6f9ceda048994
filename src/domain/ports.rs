use crate::utils::money::Amount;

/// Last-resort price for an applicant count when no template table has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPrice {
    pub price: Amount,
    pub price_with_vat: Amount,
}

/// System-default pricing supplied by the host application.
///
/// Must be a pure function of its arguments.
pub trait DefaultPricer: Send + Sync {
    fn default_price(&self, applicant_count: i64, is_israeli: bool) -> DefaultPrice;
}

impl<F> DefaultPricer for F
where
    F: Fn(i64, bool) -> DefaultPrice + Send + Sync,
{
    fn default_price(&self, applicant_count: i64, is_israeli: bool) -> DefaultPrice {
        self(applicant_count, is_israeli)
    }
}
