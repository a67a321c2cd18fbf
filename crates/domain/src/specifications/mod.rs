/// Query description: every order placed by one buyer, optionally with its
/// line items loaded up front.
///
/// Line items always carry their catalog snapshot, so loading items never
/// needs a follow-up lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerOrdersWithItemsSpecification {
    pub buyer_id: String,
    pub include_items: bool,
}

impl CustomerOrdersWithItemsSpecification {
    pub fn new(buyer_id: impl Into<String>) -> Self {
        Self {
            buyer_id: buyer_id.into(),
            include_items: true,
        }
    }

    /// Same buyer filter, orders only
    pub fn without_items(mut self) -> Self {
        self.include_items = false;
        self
    }
}
