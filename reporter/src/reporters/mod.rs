// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod junit;

use crate::events::LifecycleEvent;

/// A sink for lifecycle events. Reporters never fail the run they observe;
/// whatever goes wrong while reporting is theirs to log.
pub trait Reporter {
    fn handle(&mut self, event: &LifecycleEvent);
}

impl Reporter for Vec<Box<dyn Reporter>> {
    fn handle(&mut self, event: &LifecycleEvent) {
        for reporter in self.iter_mut() {
            reporter.handle(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::SuiteSummary;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recording(&'static str, Rc<RefCell<Vec<String>>>);

    impl Reporter for Recording {
        fn handle(&mut self, event: &LifecycleEvent) {
            self.1.borrow_mut().push(format!("{}:{}", self.0, event.name()));
        }
    }

    #[test]
    fn fans_out_in_order() {
        let seen = Rc::new(RefCell::new(vec![]));
        let mut reporters: Vec<Box<dyn Reporter>> = vec![
            Box::new(Recording("a", seen.clone())),
            Box::new(Recording("b", seen.clone())),
        ];

        reporters.handle(&LifecycleEvent::SuiteStarted(SuiteSummary::default()));
        reporters.handle(&LifecycleEvent::SuiteEnded(SuiteSummary::default()));

        assert_eq!(
            *seen.borrow(),
            vec![
                "a:suite-started".to_string(),
                "b:suite-started".to_string(),
                "a:suite-ended".to_string(),
                "b:suite-ended".to_string(),
            ]
        );
    }
}
