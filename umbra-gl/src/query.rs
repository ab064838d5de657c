//! GPU timer queries.
//!
//! Timers rely on `GL_EXT_disjoint_timer_query`; check [`Features::TIMERS`] before creating one.
//! Measured durations are only meaningful while [`Backend::is_time_continuous`] holds.
//!
//! [`Features::TIMERS`]: umbra::Features::TIMERS
//! [`Backend::is_time_continuous`]: crate::Backend::is_time_continuous

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::api::consts;
use crate::api::{Gl, QueryId};
use crate::state::GLState;

/// Elapsed GPU time between two points of the command stream.
#[derive(Debug)]
pub struct Timer<G>
where
  G: Gl,
{
  handle: QueryId,
  state: Rc<RefCell<GLState<G>>>,
}

impl<G> Drop for Timer<G>
where
  G: Gl,
{
  fn drop(&mut self) {
    self.state.borrow().ctx().delete_query(self.handle);
  }
}

impl<G> Timer<G>
where
  G: Gl,
{
  pub(crate) fn new(state: &Rc<RefCell<GLState<G>>>) -> Self {
    let handle = state.borrow().ctx().create_query();

    Timer {
      handle,
      state: state.clone(),
    }
  }

  /// Start measuring.
  pub fn begin(&self) {
    self
      .state
      .borrow()
      .ctx()
      .begin_query(consts::TIME_ELAPSED_EXT, self.handle);
  }

  /// Stop measuring.
  pub fn end(&self) {
    self.state.borrow().ctx().end_query(consts::TIME_ELAPSED_EXT);
  }

  /// Measured duration, if the GPU is done with it. Never blocks.
  pub fn duration(&self) -> Option<Duration> {
    let state = self.state.borrow();
    let ctx = state.ctx();

    if ctx.get_query_object_u(self.handle, consts::QUERY_RESULT_AVAILABLE) != consts::TRUE {
      return None;
    }

    let nanos = ctx.get_query_object_u(self.handle, consts::QUERY_RESULT);
    Some(Duration::from_nanos(nanos.into()))
  }

  /// Destroy the timer.
  pub fn release(self) {}
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::mock::{Call, MockGl};

  #[test]
  fn poll_until_ready() {
    let gl = MockGl::gles3();
    let state = Rc::new(RefCell::new(GLState::new(gl.clone(), 2)));
    let timer = Timer::new(&state);

    timer.begin();
    timer.end();
    assert_eq!(timer.duration(), None);

    gl.set_query_result(true, 1_500);
    assert_eq!(timer.duration(), Some(Duration::from_nanos(1_500)));

    let handle = timer.handle;
    timer.release();
    assert_eq!(
      gl.calls(),
      vec![
        Call::CreateQuery(handle),
        Call::BeginQuery(consts::TIME_ELAPSED_EXT, handle),
        Call::EndQuery(consts::TIME_ELAPSED_EXT),
        Call::DeleteQuery(handle),
      ]
    );
  }
}
