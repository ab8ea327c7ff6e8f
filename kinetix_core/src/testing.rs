// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`Host`] used by the controller tests.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::classify::Direction;
use crate::decide::RepeatOverride;
use crate::host::{Host, Notification, NotificationKind, ObserverOptions, Presenter, Subscription};
use crate::key::ElementKey;
use crate::measurement::Measurement;
use crate::render::StyleMutation;
use crate::time::HostTime;

/// Elements are plain indices into [`TestHost::nodes`].
pub(crate) type NodeId = u32;

#[derive(Clone, Debug, Default)]
pub(crate) struct Node {
    pub(crate) selector: String,
    pub(crate) repeat: RepeatOverride,
    pub(crate) key: Option<ElementKey>,
    pub(crate) animated: bool,
    pub(crate) state: &'static str,
}

/// Subscription activity shared between the host and its subscriptions.
#[derive(Debug, Default)]
pub(crate) struct ObserverLog {
    /// Every `observe` call, in order.
    pub(crate) observe_calls: Vec<NodeId>,
    /// Every `unobserve` call, in order.
    pub(crate) unobserve_calls: Vec<NodeId>,
    /// Elements currently observed by a connected subscription.
    pub(crate) active: Vec<NodeId>,
    /// Connected subscriptions.
    pub(crate) connected: u32,
    pub(crate) disconnects: u32,
}

#[derive(Debug)]
pub(crate) struct TestSubscription {
    log: Rc<RefCell<ObserverLog>>,
    connected: bool,
}

impl Subscription<NodeId> for TestSubscription {
    fn observe(&mut self, element: &NodeId) {
        let mut log = self.log.borrow_mut();
        log.observe_calls.push(*element);
        if !log.active.contains(element) {
            log.active.push(*element);
        }
    }

    fn unobserve(&mut self, element: &NodeId) {
        let mut log = self.log.borrow_mut();
        log.unobserve_calls.push(*element);
        log.active.retain(|e| e != element);
    }

    fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        let mut log = self.log.borrow_mut();
        log.active.clear();
        log.connected -= 1;
        log.disconnects += 1;
    }
}

#[derive(Debug, Default)]
pub(crate) struct TestHost {
    pub(crate) nodes: Vec<Node>,
    pub(crate) log: Rc<RefCell<ObserverLog>>,
    pub(crate) writes: Vec<(NodeId, StyleMutation)>,
    pub(crate) notifications: Vec<(NotificationKind, String, NodeId)>,
    pub(crate) frame_requests: u32,
    pub(crate) frames_cancelled: u32,
    /// Class of the disabled marker while it is set.
    pub(crate) disabled_marker: Option<String>,
    pub(crate) refuse_subscribe: bool,
    pub(crate) subscribed_threshold: Option<f64>,
    pub(crate) clock: u64,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds an element matching `selector` with no repeat marker.
    pub(crate) fn add(&mut self, selector: &str) -> NodeId {
        self.add_with(selector, RepeatOverride::Inherit)
    }

    pub(crate) fn add_with(&mut self, selector: &str, repeat: RepeatOverride) -> NodeId {
        let id = u32::try_from(self.nodes.len()).expect("node count fits in u32");
        self.nodes.push(Node {
            selector: selector.into(),
            repeat,
            ..Node::default()
        });
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub(crate) fn is_observed(&self, id: NodeId) -> bool {
        self.log.borrow().active.contains(&id)
    }

    pub(crate) fn enters(&self) -> usize {
        self.count(NotificationKind::Enter)
    }

    pub(crate) fn exits(&self) -> usize {
        self.count(NotificationKind::Exit)
    }

    fn count(&self, kind: NotificationKind) -> usize {
        self.notifications
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .count()
    }
}

/// A measurement of `id` whose top edge sits at `y`.
pub(crate) fn sample(id: NodeId, y: f64, ratio: f64, is_intersecting: bool) -> Measurement<NodeId> {
    Measurement::new(id, Rect::new(0.0, y, 200.0, y + 80.0), ratio, is_intersecting)
}

impl Presenter for TestHost {
    type Element = NodeId;

    fn apply(&mut self, element: &NodeId, mutation: &StyleMutation) {
        self.writes.push((*element, *mutation));
    }
}

impl Host for TestHost {
    type Subscription = TestSubscription;

    fn query(&self, selector: &str) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].selector == selector)
            .map(|i| u32::try_from(i).expect("node count fits in u32"))
            .collect()
    }

    fn key_of(&self, element: &NodeId) -> Option<ElementKey> {
        self.nodes[*element as usize].key
    }

    fn bind_key(&mut self, element: &NodeId, key: ElementKey) {
        self.nodes[*element as usize].key = Some(key);
    }

    fn repeat_override(&self, element: &NodeId) -> RepeatOverride {
        self.nodes[*element as usize].repeat
    }

    fn set_disabled_marker(&mut self, class_name: &str, disabled: bool) {
        self.disabled_marker = disabled.then(|| class_name.into());
    }

    fn set_animated(&mut self, element: &NodeId, _class_name: &str, animated: bool) {
        self.nodes[*element as usize].animated = animated;
    }

    fn set_direction(&mut self, element: &NodeId, direction: Direction) {
        self.nodes[*element as usize].state = direction.as_str();
    }

    fn notify(&mut self, notification: Notification<'_, NodeId>) {
        self.notifications.push((
            notification.kind,
            notification.name.into(),
            notification.measurement.target,
        ));
    }

    fn subscribe(&mut self, options: ObserverOptions<'_, NodeId>) -> Option<TestSubscription> {
        if self.refuse_subscribe {
            return None;
        }
        self.subscribed_threshold = Some(options.threshold);
        self.log.borrow_mut().connected += 1;
        Some(TestSubscription {
            log: Rc::clone(&self.log),
            connected: true,
        })
    }

    fn request_frame(&mut self) {
        self.frame_requests += 1;
    }

    fn cancel_frame(&mut self) {
        self.frames_cancelled += 1;
    }

    fn now(&self) -> HostTime {
        HostTime(self.clock)
    }
}
