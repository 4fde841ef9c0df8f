//! A run loop that owns the arena and one container.
//!
//! The host is the UI execution context: producers on other threads hold an
//! [`EventSender`] and post content changes, and the host applies them,
//! pumps the container and arms the settle timer.

use std::{
    sync::mpsc,
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::{
    config::ContainerConfig,
    container::{PumpReport, StackingContainer},
    core::{Core, id::ViewId, node::SurfaceContent, scheduler::SettleTimer},
    error::{Error, Result},
    event::Event,
    geom::{Rect, Size},
};

/// A cloneable handle for posting events to a [`Host`] from any thread.
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::Sender<Event>);

impl EventSender {
    /// Post a raw event.
    pub fn send(&self, event: Event) -> Result<()> {
        self.0.send(event)?;
        Ok(())
    }

    /// Post a content-size update for a surface.
    pub fn content_size(&self, surface: impl Into<ViewId>, size: Size) -> Result<()> {
        self.send(Event::ContentSize {
            surface: surface.into(),
            size,
        })
    }

    /// Post new self-laying-out content for a surface.
    pub fn surface_content(
        &self,
        surface: impl Into<ViewId>,
        content: impl SurfaceContent + 'static,
    ) -> Result<()> {
        self.send(Event::SurfaceContent {
            surface: surface.into(),
            content: Box::new(content),
        })
    }

    /// Post a new container frame.
    pub fn resize(&self, frame: Rect) -> Result<()> {
        self.send(Event::Resize(frame))
    }

    /// Ask the run loop to stop.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Event::Shutdown)
    }
}

/// Owns the arena, one container, the event channel and the settle timer.
pub struct Host {
    /// The arena.
    core: Core,
    /// The root container.
    container: StackingContainer,
    /// Sender side of the event channel.
    tx: mpsc::Sender<Event>,
    /// Receiver side of the event channel.
    rx: mpsc::Receiver<Event>,
    /// Wakes the loop when a settle is due.
    timer: SettleTimer,
}

impl Host {
    /// Build a host with a fresh arena and container.
    pub fn new(config: ContainerConfig) -> Result<Self> {
        config.validate()?;
        let mut core = Core::new();
        let container = StackingContainer::with_config(&mut core, config);
        let (tx, rx) = mpsc::channel();
        let timer = SettleTimer::new(tx.clone());
        Ok(Self {
            core,
            container,
            tx,
            rx,
            timer,
        })
    }

    /// The arena.
    pub fn core(&self) -> &Core {
        &self.core
    }

    /// The root container.
    pub fn container(&self) -> &StackingContainer {
        &self.container
    }

    /// Mutable access to the arena and the container together, for building
    /// the view tree on the UI context.
    pub fn parts(&mut self) -> (&mut Core, &mut StackingContainer) {
        (&mut self.core, &mut self.container)
    }

    /// A handle for posting events from other threads.
    pub fn sender(&self) -> EventSender {
        EventSender(self.tx.clone())
    }

    /// Apply one event and pump the container. Returns false on shutdown.
    pub fn handle(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::ContentSize { surface, size } => {
                if let Err(e) = self.core.set_content_size(surface, size) {
                    warn!(?surface, %e, "dropping content-size event");
                }
            }
            Event::SurfaceContent { surface, content } => {
                if let Err(e) = self.core.set_surface_content(surface, content) {
                    warn!(?surface, %e, "dropping surface-content event");
                }
            }
            Event::Resize(frame) => self.container.set_frame(&mut self.core, frame)?,
            Event::Settle => {}
            Event::Shutdown => {
                debug!("shutdown requested");
                return Ok(false);
            }
        }
        self.pump()?;
        Ok(true)
    }

    /// Pump the container now and re-arm the settle timer.
    pub fn pump(&mut self) -> Result<PumpReport> {
        let report = self.container.pump(&mut self.core, Instant::now())?;
        self.timer.arm(self.container.next_deadline());
        Ok(report)
    }

    /// Handle events until shutdown.
    pub fn run(&mut self) -> Result<()> {
        self.pump()?;
        loop {
            let event = self.rx.recv()?;
            if !self.handle(event)? {
                return Ok(());
            }
        }
    }

    /// Handle events until the channel is empty, no notification for the
    /// container is queued and no settle is pending, or until shutdown.
    /// Fails if that takes longer than `timeout`.
    pub fn run_until_idle(&mut self, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        self.pump()?;
        loop {
            let event = match self.rx.try_recv() {
                Ok(event) => event,
                Err(mpsc::TryRecvError::Empty) => {
                    // Layout can queue notifications of its own.
                    if self.core.pending_notifications() > 0 && self.pump()?.notifications > 0 {
                        continue;
                    }
                    if self.container.pending_settles() == 0 {
                        return Ok(());
                    }
                    let remaining = timeout
                        .checked_sub(start.elapsed())
                        .ok_or_else(|| Error::RunLoop("timed out waiting for idle".into()))?;
                    match self.rx.recv_timeout(remaining) {
                        Ok(event) => event,
                        Err(mpsc::RecvTimeoutError::Timeout) => {
                            return Err(Error::RunLoop("timed out waiting for idle".into()));
                        }
                        Err(mpsc::RecvTimeoutError::Disconnected) => {
                            return Err(Error::RunLoop("event channel closed".into()));
                        }
                    }
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    return Err(Error::RunLoop("event channel closed".into()));
                }
            };
            if !self.handle(event)? {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{
        adapter::ScrollableContent,
        container::HorizontalInset,
        core::node::{Fixed, ScrollSurface},
        testing::Rows,
    };

    fn host() -> Result<Host> {
        Host::new(ContainerConfig::default().with_settle_delay(Duration::from_millis(20)))
    }

    #[test]
    fn settles_content_posted_from_another_thread() -> Result<()> {
        let mut host = host()?;
        let (web, footer) = {
            let (core, container) = host.parts();
            container.set_frame(core, Rect::new(0.0, 0.0, 320.0, 480.0))?;
            let web = core.add_web_content(
                "web",
                ScrollSurface::new().with_content_size(Size::new(320.0, 100.0)),
            );
            let footer = core.add_plain("footer", Fixed(Size::new(0.0, 30.0)));
            container.add_scrollable_view(
                core,
                ScrollableContent::from_web_content(web),
                HorizontalInset::default(),
            )?;
            container.add_simple_view(core, footer, HorizontalInset::default())?;
            (web, footer)
        };
        host.run_until_idle(Duration::from_secs(5))?;
        assert_eq!(host.core().frame(footer).map(|f| f.top()), Some(100.0));

        let tx = host.sender();
        thread::spawn(move || {
            for h in [150.0, 300.0, 600.0] {
                if tx.content_size(web.surface, Size::new(320.0, h)).is_err() {
                    return;
                }
            }
        })
        .join()
        .map_err(|_| Error::Internal("producer panicked".into()))?;

        host.run_until_idle(Duration::from_secs(5))?;
        assert_eq!(host.core().frame(footer).map(|f| f.top()), Some(600.0));
        assert_eq!(host.container().pending_settles(), 0);
        Ok(())
    }

    #[test]
    fn surface_content_reflows_and_settles() -> Result<()> {
        let mut host = host()?;
        let rows = {
            let (core, container) = host.parts();
            container.set_frame(core, Rect::new(0.0, 0.0, 320.0, 480.0))?;
            let rows = core.add_scroll_surface("rows", ScrollSurface::new());
            container.add_scrollable_view(
                core,
                ScrollableContent::from_scroll_surface(rows),
                HorizontalInset::default(),
            )?;
            rows
        };
        host.run_until_idle(Duration::from_secs(5))?;
        host.sender().surface_content(rows, Rows::new(10, 44.0))?;
        host.run_until_idle(Duration::from_secs(5))?;
        let wrapper = host.container().entries()[0].root();
        assert_eq!(host.core().frame(wrapper).map(|f| f.height()), Some(440.0));
        Ok(())
    }

    #[test]
    fn stale_events_are_dropped() -> Result<()> {
        let mut host = host()?;
        let gone = {
            let (core, _) = host.parts();
            let s = core.add_scroll_surface("gone", ScrollSurface::new());
            core.remove_subtree(s)?;
            s
        };
        assert!(host.handle(Event::ContentSize {
            surface: gone.id(),
            size: Size::new(1.0, 1.0),
        })?);
        Ok(())
    }

    #[test]
    fn shutdown_stops_the_loop() -> Result<()> {
        let mut host = host()?;
        host.sender().shutdown()?;
        host.run()?;
        Ok(())
    }
}
