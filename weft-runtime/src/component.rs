use std::rc::Rc;

use crate::props::Props;
use crate::view::{IntoView, Lazy, View};

/// Invoke `component` with `props` when the view is first rendered.
///
/// The call happens once, untracked, in the scope that was current here, so
/// the component's own effects outlive re-runs of the region that shows it.
pub fn create_component<F, V>(component: F, props: Props) -> View
where
    F: FnOnce(Props) -> V + 'static,
    V: IntoView,
{
    View::Deferred(Rc::new(Lazy::new(move || component(props).into_view())))
}
