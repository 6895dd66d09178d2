//! Finite state machine over the navigable views.
//!
//! The navigator owns the single "current view" plus the selected host id.
//! Sub-views (network, disk, process) are only reachable from the detail
//! view, so the renderer is never asked to draw a sub-view without a
//! selected host. Illegal transitions are rejected without mutating state.

use thiserror::Error;

/// The navigable views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
    Network,
    Disk,
    Process,
}

/// Outcome of a hardware/system back gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// The gesture was consumed by an internal transition.
    Handled,
    /// Already on the list view: defer to the platform's default exit.
    Exit,
}

/// A rejected view transition. The navigator state is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Illegal transition from {from:?}: {action}")]
    IllegalTransition {
        from: View,
        action: &'static str,
    },
}

/// View state machine. Created at process start in the list view and lives
/// for the process lifetime.
#[derive(Debug)]
pub struct Navigator {
    view: View,
    selected_host: Option<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            view: View::List,
            selected_host: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_host(&self) -> Option<&str> {
        self.selected_host.as_deref()
    }

    /// List → Detail, selecting the given host.
    pub fn select_host(&mut self, id: impl Into<String>) -> Result<(), NavigationError> {
        if self.view != View::List {
            return Err(NavigationError::IllegalTransition {
                from: self.view,
                action: "selectHost",
            });
        }
        self.selected_host = Some(id.into());
        self.view = View::Detail;
        Ok(())
    }

    /// Detail → Network. Selected host unchanged.
    pub fn open_network(&mut self) -> Result<(), NavigationError> {
        self.open_subview(View::Network, "openNetwork")
    }

    /// Detail → Disk. Selected host unchanged.
    pub fn open_disk(&mut self) -> Result<(), NavigationError> {
        self.open_subview(View::Disk, "openDisk")
    }

    /// Detail → Process. Selected host unchanged.
    pub fn open_process(&mut self) -> Result<(), NavigationError> {
        self.open_subview(View::Process, "openProcess")
    }

    fn open_subview(&mut self, target: View, action: &'static str) -> Result<(), NavigationError> {
        if self.view != View::Detail {
            return Err(NavigationError::IllegalTransition {
                from: self.view,
                action,
            });
        }
        self.view = target;
        Ok(())
    }

    /// {Network, Disk, Process} → Detail.
    pub fn back_from_subview(&mut self) -> Result<(), NavigationError> {
        match self.view {
            View::Network | View::Disk | View::Process => {
                self.view = View::Detail;
                Ok(())
            }
            from => Err(NavigationError::IllegalTransition {
                from,
                action: "backFromSubview",
            }),
        }
    }

    /// Detail → List, clearing the selected host.
    pub fn back_to_list(&mut self) -> Result<(), NavigationError> {
        if self.view != View::Detail {
            return Err(NavigationError::IllegalTransition {
                from: self.view,
                action: "backToList",
            });
        }
        self.view = View::List;
        self.selected_host = None;
        Ok(())
    }

    /// Map the hardware back gesture onto the transition table.
    pub fn back(&mut self) -> BackAction {
        match self.view {
            View::Network | View::Disk | View::Process => {
                self.back_from_subview().ok();
                BackAction::Handled
            }
            View::Detail => {
                self.back_to_list().ok();
                BackAction::Handled
            }
            View::List => BackAction::Exit,
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
