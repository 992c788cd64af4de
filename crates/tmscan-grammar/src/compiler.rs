//! Two-pass grammar compilation.
//!
//! The first pass walks the whole document, including repositories nested
//! inside individual rules, and allocates an arena slot for every repository
//! entry and every inline rule before any reference is resolved. The second
//! pass assigns each slot its [`PatternFunctionality`], resolving `#name`
//! includes against the innermost repository that defines the name. Because
//! every slot exists before resolution starts, forward references and
//! self or mutual inclusion resolve like any other lookup.

use std::collections::BTreeMap;

use tmscan_core::Name;
use tracing::debug;

use crate::document::{GrammarDocument, Include, RawCaptures, RawRule, RuleBody};
use crate::error::GrammarError;
use crate::graph::{Grammar, Matched, Pattern, PatternFunctionality, PatternId, Wrapped};

/// Tracing target for grammar compilation.
const COMPILER_TARGET: &str = "tmscan_grammar::compiler";

/// Compiles a decoded grammar document into a [`Grammar`].
///
/// # Errors
///
/// Returns [`GrammarError::IncludeNotFound`] when a `#name` include has no
/// repository entry in scope, [`GrammarError::InvalidInclude`] for an
/// unsupported include string, and [`GrammarError::Schema`] for a rule that
/// is structurally invalid.
pub fn compile(document: &GrammarDocument) -> Result<Grammar, GrammarError> {
    let mut compiler = Compiler::default();
    let root = compiler.register_repository(&document.repository, None)?;
    let mut top_level = Vec::with_capacity(document.patterns.len());
    for rule in &document.patterns {
        top_level.push(compiler.register_child(rule, None, root)?);
    }

    let patterns = top_level
        .into_iter()
        .map(|reference| compiler.resolve(reference))
        .collect::<Result<Vec<_>, _>>()?;
    let arena = compiler.finish()?;

    debug!(
        target: COMPILER_TARGET,
        grammar = %document.name,
        scope = %document.scope_name,
        top_level = patterns.len(),
        arena = arena.len(),
        "compiled grammar"
    );

    Ok(Grammar {
        uuid: document.uuid.clone(),
        name: document.name.clone(),
        scope_name: Name::new(&document.scope_name),
        patterns,
        arena,
    })
}

/// Decodes and compiles a JSON grammar document.
///
/// # Errors
///
/// Returns [`GrammarError::Decode`] for malformed JSON, otherwise the same
/// errors as [`compile`].
pub fn compile_json(json: &str) -> Result<Grammar, GrammarError> {
    compile(&GrammarDocument::from_json(json)?)
}

type ScopeId = usize;

/// One repository level; lookups fall back to `parent`.
#[derive(Debug)]
struct Scope<'d> {
    parent: Option<ScopeId>,
    entries: BTreeMap<&'d str, PatternId>,
}

/// A child or top-level rule as seen from its container.
#[derive(Debug, Clone)]
enum Reference {
    Inline(PatternId),
    Include { include: Include, scope: ScopeId },
}

/// A placeholder awaiting its functionality.
#[derive(Debug)]
struct Slot {
    name: Option<Name>,
    parent: Option<PatternId>,
    functionality: Option<PatternFunctionality>,
}

/// Registration record consumed by the second pass.
#[derive(Debug)]
struct Draft<'d> {
    id: PatternId,
    rule: &'d RawRule,
    body: RuleBody<'d>,
    children: Vec<Reference>,
}

#[derive(Debug, Default)]
struct Compiler<'d> {
    slots: Vec<Slot>,
    scopes: Vec<Scope<'d>>,
    drafts: Vec<Draft<'d>>,
    grammar_ref: Option<PatternId>,
}

impl<'d> Compiler<'d> {
    fn allocate(&mut self, name: Option<Name>, parent: Option<PatternId>) -> PatternId {
        let id = PatternId::from_index(self.slots.len());
        self.slots.push(Slot {
            name,
            parent,
            functionality: None,
        });
        id
    }

    fn register_repository(
        &mut self,
        repository: &'d BTreeMap<String, RawRule>,
        parent: Option<ScopeId>,
    ) -> Result<ScopeId, GrammarError> {
        let scope = self.scopes.len();
        self.scopes.push(Scope {
            parent,
            entries: BTreeMap::new(),
        });

        let mut pending = Vec::with_capacity(repository.len());
        for (entry, rule) in repository {
            // Unnamed concrete entries are scoped by their key.
            let name = if rule.include.is_some() {
                rule.scope_name()
            } else {
                rule.scope_name().or_else(|| Some(Name::new(entry)))
            };
            let id = self.allocate(name, None);
            if let Some(level) = self.scopes.get_mut(scope) {
                level.entries.insert(entry.as_str(), id);
            }
            pending.push((id, rule));
        }

        for (id, rule) in pending {
            self.register_body(id, rule, scope)?;
        }
        Ok(scope)
    }

    fn register_body(
        &mut self,
        id: PatternId,
        rule: &'d RawRule,
        enclosing: ScopeId,
    ) -> Result<(), GrammarError> {
        let scope = if rule.repository.is_empty() {
            enclosing
        } else {
            self.register_repository(&rule.repository, Some(enclosing))?
        };

        let body = rule.body()?;
        let children = match body {
            RuleBody::Include(include) => vec![Reference::Include {
                include: Include::parse(include)?,
                scope,
            }],
            RuleBody::Match(_) => Vec::new(),
            RuleBody::Wrapped { .. } | RuleBody::Group(_) => {
                let mut children = Vec::new();
                for child in rule.patterns.iter().flatten() {
                    children.push(self.register_child(child, Some(id), scope)?);
                }
                children
            }
        };

        self.drafts.push(Draft {
            id,
            rule,
            body,
            children,
        });
        Ok(())
    }

    fn register_child(
        &mut self,
        rule: &'d RawRule,
        parent: Option<PatternId>,
        scope: ScopeId,
    ) -> Result<Reference, GrammarError> {
        if let Some(include) = &rule.include {
            return Ok(Reference::Include {
                include: Include::parse(include)?,
                scope,
            });
        }
        let id = self.allocate(rule.scope_name(), parent);
        self.register_body(id, rule, scope)?;
        Ok(Reference::Inline(id))
    }

    fn lookup(&self, entry: &str, scope: ScopeId) -> Option<PatternId> {
        let mut current = Some(scope);
        while let Some(index) = current {
            let level = self.scopes.get(index)?;
            if let Some(id) = level.entries.get(entry) {
                return Some(*id);
            }
            current = level.parent;
        }
        None
    }

    fn resolve(&mut self, reference: Reference) -> Result<PatternId, GrammarError> {
        match reference {
            Reference::Inline(id) => Ok(id),
            Reference::Include {
                include: Include::Repository(entry),
                scope,
            } => self
                .lookup(&entry, scope)
                .ok_or_else(|| GrammarError::include_not_found(entry)),
            Reference::Include {
                include: Include::Grammar,
                ..
            } => Ok(self.grammar_ref()),
        }
    }

    fn grammar_ref(&mut self) -> PatternId {
        if let Some(id) = self.grammar_ref {
            return id;
        }
        let id = self.allocate(None, None);
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.functionality = Some(PatternFunctionality::GrammarRef);
        }
        self.grammar_ref = Some(id);
        id
    }

    fn finish(mut self) -> Result<Vec<Pattern>, GrammarError> {
        let drafts = std::mem::take(&mut self.drafts);
        for draft in drafts {
            let functionality = self.functionality_of(&draft)?;
            if let Some(slot) = self.slots.get_mut(draft.id.index()) {
                slot.functionality = Some(functionality);
            }
        }

        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                let functionality = slot.functionality.ok_or_else(|| {
                    GrammarError::schema(format!("pattern {index} was never resolved"))
                })?;
                Ok(Pattern {
                    name: slot.name,
                    functionality,
                    parent: slot.parent,
                })
            })
            .collect()
    }

    fn functionality_of(
        &mut self,
        draft: &Draft<'d>,
    ) -> Result<PatternFunctionality, GrammarError> {
        let rule = draft.rule;
        let children = draft
            .children
            .iter()
            .cloned()
            .map(|reference| self.resolve(reference))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match draft.body {
            RuleBody::Include(_) => {
                if matches!(
                    draft.children.first(),
                    Some(Reference::Include {
                        include: Include::Grammar,
                        ..
                    })
                ) {
                    PatternFunctionality::GrammarRef
                } else {
                    PatternFunctionality::Group(children)
                }
            }
            RuleBody::Match(regex) => PatternFunctionality::Match(Matched {
                regex: regex.to_owned(),
                captures: rule.captures.as_ref().map(RawCaptures::to_collection),
            }),
            RuleBody::Wrapped { begin, end } => {
                let shared = rule.captures.as_ref();
                PatternFunctionality::Wrapped(Wrapped {
                    begin: begin.to_owned(),
                    begin_captures: rule
                        .begin_captures
                        .as_ref()
                        .or(shared)
                        .map(RawCaptures::to_collection),
                    end: end.to_owned(),
                    end_captures: rule
                        .end_captures
                        .as_ref()
                        .or(shared)
                        .map(RawCaptures::to_collection),
                    content_name: rule.content_name.as_deref().map(Name::new),
                    children,
                })
            }
            RuleBody::Group(_) => PatternFunctionality::Group(children),
        })
    }
}
