//! Transaction decoding state machine
//!
//! Consumes bus events one at a time and classifies every byte against the
//! command table. The flavor of a transaction is fixed by its opcode:
//!
//! - `READ_CMD_BUFF` polls: CTS, then the response of the last
//!   non-immediate command seen on the bus
//! - immediate commands: MISO response bytes straight after the opcode
//! - everything else: MOSI argument bytes
//!
//! Anomalies never abort decoding. They show up as `Unknown argument`,
//! `Unexpected response` or `Unknown command` labels, or the transaction is
//! dropped without output when no byte was exchanged.

use crate::bus::{BusEvent, ByteEvent, ByteRole, Timestamp, Transaction};
use crate::commands::{lookup, opcode, CommandDescriptor, FieldName};
use crate::config::protocol::{CTS_READY, FIFO_SIZE_LIMIT};
use crate::decoder::annotation::{
    label, Annotation, AnnotationKind, ByteAnnotation, Label, TransactionSummary,
};
use crate::decoder::context::DeferredResponseContext;
use heapless::Vec;
use log::{debug, trace};

const OPCODE_LABEL: &str = "> CMD";
const UNKNOWN_ARGUMENT: &str = "Unknown argument";
const UNEXPECTED_RESPONSE: &str = "Unexpected response";
const NOT_READY_NOTE: &str = "not yet ready";

/// How bytes after the opcode are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    /// MISO response in the same transaction
    Immediate,
    /// CTS followed by the answer to `previous`
    DeferredBufferRead { previous: Option<CommandDescriptor> },
    /// MOSI arguments
    WriteArguments,
}

impl Flavor {
    fn select(descriptor: &CommandDescriptor, context: &DeferredResponseContext) -> Self {
        if descriptor.id == opcode::READ_CMD_BUFF {
            Flavor::DeferredBufferRead {
                previous: context.last_non_immediate().map(lookup),
            }
        } else if descriptor.immediate_response {
            Flavor::Immediate
        } else {
            Flavor::WriteArguments
        }
    }

    /// Classify the byte at `offset` (1-based, the opcode is offset 0).
    fn classify(
        &self,
        descriptor: &CommandDescriptor,
        offset: usize,
        mosi: u8,
        miso: u8,
    ) -> (u8, ByteRole, Label) {
        match self {
            Flavor::WriteArguments => (
                mosi,
                ByteRole::Argument,
                field_label("> ", descriptor.argument_field(offset), UNKNOWN_ARGUMENT),
            ),
            Flavor::Immediate => (
                miso,
                ByteRole::Response,
                field_label("< ", descriptor.response_field(offset - 1), UNEXPECTED_RESPONSE),
            ),
            Flavor::DeferredBufferRead { previous } => (
                miso,
                ByteRole::Response,
                polled_label(previous.as_ref(), offset, miso),
            ),
        }
    }
}

fn field_label(prefix: &str, field: FieldName, fallback: &str) -> Label {
    match field {
        FieldName::Missing => label(format_args!("{}{}", prefix, fallback)),
        name => label(format_args!("{}{}", prefix, name)),
    }
}

fn polled_label(previous: Option<&CommandDescriptor>, offset: usize, value: u8) -> Label {
    if offset == 1 {
        let state = if value == CTS_READY { "ready" } else { "not ready" };
        return label(format_args!("< CTS ({})", state));
    }

    let Some(previous) = previous else {
        return label(format_args!("< {}", UNEXPECTED_RESPONSE));
    };

    let index = offset - 2;
    if previous.id == opcode::FIFO_INFO && index < 2 {
        return fifo_info_label(index, value);
    }

    field_label("< ", previous.response_field(index), UNEXPECTED_RESPONSE)
}

/// FIFO_INFO answers are byte counts, checked against the FIFO size
fn fifo_info_label(index: usize, value: u8) -> Label {
    let (name, flag) = if index == 0 {
        ("RX_FIFO_COUNT", "overflow!")
    } else {
        ("TX_FIFO_SPACE", "illegal!")
    };

    if value > FIFO_SIZE_LIMIT {
        label(format_args!("< {} ({})", name, flag))
    } else {
        label(format_args!("< {} ({})", name, value))
    }
}

fn kind_for(role: ByteRole) -> AnnotationKind {
    match role {
        ByteRole::Command => AnnotationKind::CommandByte,
        ByteRole::Argument => AnnotationKind::ArgumentByte,
        ByteRole::Response => AnnotationKind::ResponseByte,
    }
}

/// Opcode-dependent part of an open transaction
#[derive(Debug, Clone, Copy)]
struct ActiveCommand {
    descriptor: CommandDescriptor,
    flavor: Flavor,
}

/// Push-driven decoder for one SPI capture.
///
/// Each instance owns its open transaction and its deferred-response
/// context; independent captures need independent decoders.
#[derive(Debug, Clone, Default)]
pub struct TransactionDecoder {
    transaction: Option<Transaction>,
    active: Option<ActiveCommand>,
    context: DeferredResponseContext,
}

impl TransactionDecoder {
    /// Create a decoder with an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder resuming from an existing context.
    pub fn with_context(context: DeferredResponseContext) -> Self {
        Self {
            transaction: None,
            active: None,
            context,
        }
    }

    /// Deferred-response state carried between transactions.
    pub fn context(&self) -> &DeferredResponseContext {
        &self.context
    }

    /// Returns true while NSEL is asserted.
    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Drop any open transaction and forget the context, for a new capture.
    pub fn reset(&mut self) {
        self.transaction = None;
        self.active = None;
        self.context.clear();
    }

    /// Handle a single bus event.
    ///
    /// Returns the annotation produced by the event, if any.
    pub fn feed(&mut self, event: BusEvent) -> Option<Annotation> {
        match event {
            BusEvent::Assert(t) => {
                self.assert(t);
                None
            }
            BusEvent::Byte {
                mosi,
                miso,
                start,
                end,
            } => self.byte_event(mosi, miso, start, end).map(Annotation::from),
            BusEvent::Deassert(t) => self.deassert(t).map(Annotation::from),
        }
    }

    /// Decode a sequence of events, yielding annotations in order.
    pub fn decode<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Annotation> + 'a
    where
        I: IntoIterator<Item = BusEvent>,
        I::IntoIter: 'a,
    {
        events.into_iter().filter_map(move |event| self.feed(event))
    }

    /// NSEL went active. An already open transaction is discarded.
    pub fn assert(&mut self, t: Timestamp) {
        if let Some(open) = self.transaction.as_ref() {
            debug!(
                "NSEL re-asserted at {}, discarding transaction with {} bytes",
                t,
                open.len()
            );
        }

        self.transaction = Some(Transaction::new(t));
        self.active = None;
    }

    /// One full-duplex byte transfer.
    pub fn byte_event(
        &mut self,
        mosi: u8,
        miso: u8,
        start: Timestamp,
        end: Timestamp,
    ) -> Option<ByteAnnotation> {
        let Some(transaction) = self.transaction.as_mut() else {
            trace!("byte outside transaction at {}, ignored", start);
            return None;
        };

        let Some(active) = self.active else {
            transaction.push(ByteEvent {
                value: mosi,
                start,
                end,
                role: ByteRole::Command,
            });

            let descriptor = lookup(mosi);
            let flavor = Flavor::select(&descriptor, &self.context);
            trace!("opcode 0x{:02x} {} ({:?})", mosi, descriptor.name, flavor);
            self.active = Some(ActiveCommand { descriptor, flavor });

            return Some(ByteAnnotation::new(
                AnnotationKind::CommandByte,
                start,
                end,
                label(format_args!("{}", OPCODE_LABEL)),
                mosi,
            ));
        };

        let offset = transaction.len();
        let (value, role, text) = active.flavor.classify(&active.descriptor, offset, mosi, miso);
        transaction.push(ByteEvent {
            value,
            start,
            end,
            role,
        });
        trace!("byte {} = 0x{:02x} {}", offset, value, text);

        Some(ByteAnnotation::new(kind_for(role), start, end, text, value))
    }

    /// NSEL went inactive. Emits the transaction summary.
    pub fn deassert(&mut self, t: Timestamp) -> Option<TransactionSummary> {
        let Some(transaction) = self.transaction.take() else {
            trace!("NSEL deasserted at {} with no open transaction", t);
            return None;
        };

        let Some(active) = self.active.take() else {
            debug!("empty transaction {}..{} dropped", transaction.start(), t);
            return None;
        };

        let mut payload = Vec::new();
        for byte in transaction.bytes() {
            let _ = payload.push(byte.value);
        }

        // A bare CTS poll that came back busy
        let note = match (active.flavor, transaction.bytes()) {
            (Flavor::DeferredBufferRead { .. }, [_, cts]) if cts.value != CTS_READY => {
                Some(NOT_READY_NOTE)
            }
            _ => None,
        };

        self.context.record(&active.descriptor);

        debug!(
            "{} ({} bytes) {}..{}",
            active.descriptor.name,
            transaction.len(),
            transaction.start(),
            t
        );

        Some(TransactionSummary {
            start: transaction.start(),
            end: t,
            label: label(format_args!("{}", active.descriptor.name)),
            payload,
            note,
            truncated: transaction.is_truncated(),
        })
    }
}
