use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Destructive,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

pub enum ToastAction {
    Push {
        title: String,
        description: String,
        variant: ToastVariant,
    },
    Dismiss(u32),
}

#[derive(Default, PartialEq)]
pub struct ToastState {
    next_id: u32,
    pub toasts: Vec<Toast>,
}

impl Reducible for ToastState {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut toasts = self.toasts.clone();
        let mut next_id = self.next_id;
        match action {
            ToastAction::Push { title, description, variant } => {
                toasts.push(Toast { id: next_id, title, description, variant });
                next_id = next_id.wrapping_add(1);
            }
            ToastAction::Dismiss(id) => {
                let before = toasts.len();
                toasts.retain(|toast| toast.id != id);
                if toasts.len() == before {
                    return self;
                }
            }
        }
        Rc::new(Self { next_id, toasts })
    }
}

/// Handle for raising notifications from anywhere under a `ToastProvider`.
#[derive(Clone, PartialEq)]
pub struct Toaster {
    dispatch: Callback<ToastAction>,
}

impl Default for Toaster {
    fn default() -> Self {
        Self {
            dispatch: Callback::from(|_| ()),
        }
    }
}

impl Toaster {
    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(title.into(), description.into(), ToastVariant::Success);
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(title.into(), description.into(), ToastVariant::Destructive);
    }

    pub fn dismiss(&self, id: u32) {
        self.dispatch.emit(ToastAction::Dismiss(id));
    }

    fn push(&self, title: String, description: String, variant: ToastVariant) {
        self.dispatch.emit(ToastAction::Push { title, description, variant });
    }
}

#[hook]
pub fn use_toaster() -> Toaster {
    use_context::<Toaster>().unwrap_or_default()
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let state = use_reducer(ToastState::default);
    let toaster = {
        let dispatcher = state.dispatcher();
        use_state(move || Toaster {
            dispatch: Callback::from(move |action| dispatcher.dispatch(action)),
        })
    };

    html! {
        <ContextProvider<Toaster> context={(*toaster).clone()}>
            { for props.children.iter() }
            <div class="toast-viewport">
                <style>
                    {r#"
                        .toast-viewport {
                            position: fixed;
                            bottom: 1.5rem;
                            right: 1.5rem;
                            display: flex;
                            flex-direction: column;
                            gap: 0.75rem;
                            z-index: 1000;
                        }
                        .toast {
                            min-width: 280px;
                            max-width: 380px;
                            padding: 1rem 1.25rem;
                            border-radius: 12px;
                            background: rgba(26, 26, 26, 0.95);
                            border: 1px solid rgba(126, 178, 255, 0.2);
                            color: #fff;
                            cursor: pointer;
                            animation: toastIn 0.3s ease-out;
                        }
                        .toast.destructive {
                            background: rgba(120, 20, 20, 0.95);
                            border-color: rgba(255, 99, 99, 0.4);
                        }
                        .toast-title {
                            font-weight: 600;
                            margin-bottom: 0.25rem;
                        }
                        .toast-description {
                            color: #ddd;
                            font-size: 0.9rem;
                        }
                        @keyframes toastIn {
                            from { transform: translateY(20px); opacity: 0; }
                            to { transform: translateY(0); opacity: 1; }
                        }
                    "#}
                </style>
                {
                    state.toasts.iter().map(|toast| {
                        html! {
                            <ToastView key={toast.id} toast={toast.clone()} toaster={(*toaster).clone()} />
                        }
                    }).collect::<Html>()
                }
            </div>
        </ContextProvider<Toaster>>
    }
}

#[derive(Properties, PartialEq)]
struct ToastViewProps {
    toast: Toast,
    toaster: Toaster,
}

#[function_component(ToastView)]
fn toast_view(props: &ToastViewProps) -> Html {
    let id = props.toast.id;

    {
        let toaster = props.toaster.clone();
        use_effect_with_deps(
            move |_| {
                let timeout = Timeout::new(config::TOAST_DISMISS_MS, move || toaster.dismiss(id));
                // Dropping the timeout cancels it if the toast is dismissed by hand
                move || drop(timeout)
            },
            id,
        );
    }

    let onclick = {
        let toaster = props.toaster.clone();
        Callback::from(move |_: MouseEvent| toaster.dismiss(id))
    };

    let class = match props.toast.variant {
        ToastVariant::Success => "toast",
        ToastVariant::Destructive => "toast destructive",
    };

    html! {
        <div class={class} role="status" {onclick}>
            <div class="toast-title">{ &props.toast.title }</div>
            <div class="toast-description">{ &props.toast.description }</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(state: Rc<ToastState>, title: &str, variant: ToastVariant) -> Rc<ToastState> {
        state.reduce(ToastAction::Push {
            title: title.to_string(),
            description: String::new(),
            variant,
        })
    }

    #[test]
    fn pushes_get_increasing_ids() {
        let state = Rc::new(ToastState::default());
        let state = push(state, "Brief saved", ToastVariant::Success);
        let state = push(state, "Could not save brief", ToastVariant::Destructive);
        let ids: Vec<u32> = state.toasts.iter().map(|toast| toast.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(state.toasts[1].variant, ToastVariant::Destructive);
    }

    #[test]
    fn dismiss_removes_only_that_toast() {
        let state = Rc::new(ToastState::default());
        let state = push(state, "a", ToastVariant::Success);
        let state = push(state, "b", ToastVariant::Success);
        let state = state.reduce(ToastAction::Dismiss(0));
        assert_eq!(state.toasts.len(), 1);
        assert_eq!(state.toasts[0].title, "b");
    }

    #[test]
    fn dismissing_unknown_id_keeps_state() {
        let state = push(Rc::new(ToastState::default()), "a", ToastVariant::Success);
        let after = state.clone().reduce(ToastAction::Dismiss(42));
        assert!(Rc::ptr_eq(&state, &after));
    }

    #[test]
    fn ids_do_not_repeat_after_dismiss() {
        let state = push(Rc::new(ToastState::default()), "a", ToastVariant::Success);
        let state = state.reduce(ToastAction::Dismiss(0));
        let state = push(state, "b", ToastVariant::Success);
        assert_eq!(state.toasts[0].id, 1);
    }
}
