use serde::Deserialize;

use crate::time::TimerToken;

/// Everything the view layer can tell a [`super::HoverIntentMenu`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum MenuMessage<K, S = K> {
    /// Pointer entered a trigger or its panel
    PointerEnter(K),
    /// Pointer left a trigger or its panel
    PointerLeave,
    /// Trigger clicked or tapped
    Click(K),
    /// Pointer entered a nested trigger or sub-panel
    SubPointerEnter(S),
    /// Nested trigger clicked or tapped
    SubClick(S),
    /// Pointer left a sub-panel
    SubPointerLeave,
    /// Programmatic close (navigation, drawer collapse)
    Close,
    /// A scheduled close came due
    #[serde(skip)]
    TimerFired(TimerToken),
    /// Owning view unmounted
    Dispose,
}
