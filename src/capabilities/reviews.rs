use bytes::Bytes;
use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::error::ReviewsError;

/// Raw page payload, decoded by the core.
pub type PageResult = Result<Bytes, ReviewsError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReviewsOperation {
    GetReviews { offset: usize },
}

impl Operation for ReviewsOperation {
    type Output = PageResult;
}

/// Asks the shell for one page of reviews starting at `offset`.
pub struct Reviews<Ev> {
    context: CapabilityContext<ReviewsOperation, Ev>,
}

impl<Ev> Capability<Ev> for Reviews<Ev> {
    type Operation = ReviewsOperation;
    type MappedSelf<MappedEv> = Reviews<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Reviews::new(self.context.map_event(f))
    }
}

impl<Ev> Reviews<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ReviewsOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn get_reviews<F>(&self, offset: usize, callback: F)
    where
        F: FnOnce(PageResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(ReviewsOperation::GetReviews { offset })
                .await;
            ctx.update_app(callback(result));
        });
    }
}
