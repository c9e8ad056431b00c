use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use arbor_errors::SyntaxError;
use arbor_syntax::ast::{AstNode, SourceFile};
use arbor_syntax::{GreenNode, Indel, SyntaxNode};
use log::debug;

use crate::{reparsing, validation};

/// The result of parsing: a green root and the errors found on the way.
///
/// Cloning shares the tree and the errors.
pub struct Parse<T> {
    green: GreenNode,
    errors: Option<Arc<[SyntaxError]>>,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Clone for Parse<T> {
    fn clone(&self) -> Self {
        Self { green: self.green.clone(), errors: self.errors.clone(), _ty: PhantomData }
    }
}

impl<T> PartialEq for Parse<T> {
    fn eq(&self, other: &Self) -> bool {
        self.green == other.green && self.errors == other.errors
    }
}

impl<T> Eq for Parse<T> {}

impl<T> fmt::Debug for Parse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parse")
            .field("green", &self.green)
            .field("errors", &self.stored_errors())
            .finish()
    }
}

impl<T> Parse<T> {
    pub(crate) fn new(green: GreenNode, errors: Vec<SyntaxError>) -> Self {
        let errors = (!errors.is_empty()).then(|| Arc::from(errors));
        Self { green, errors, _ty: PhantomData }
    }

    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Errors recorded while building, followed by the literal checks.
    pub fn errors(&self) -> Vec<SyntaxError> {
        let mut errors = self.stored_errors().to_vec();
        validation::validate(&self.syntax_node(), &mut errors);
        errors
    }

    pub(crate) fn stored_errors(&self) -> &[SyntaxError] {
        self.errors.as_deref().unwrap_or_default()
    }

    pub fn to_syntax(self) -> Parse<SyntaxNode> {
        Parse { green: self.green, errors: self.errors, _ty: PhantomData }
    }
}

impl<T: AstNode> Parse<T> {
    /// The typed root.
    ///
    /// # Panics
    ///
    /// If the root does not have the kind `T` was parsed as.
    pub fn tree(&self) -> T {
        match T::cast(self.syntax_node()) {
            Some(tree) => tree,
            None => unreachable!("root of a parse has the wrong kind"),
        }
    }

    /// The typed root, or the errors if there are any.
    pub fn ok(self) -> Result<T, Vec<SyntaxError>> {
        let errors = self.errors();
        if errors.is_empty() { Ok(self.tree()) } else { Err(errors) }
    }
}

impl Parse<SyntaxNode> {
    pub fn cast<N: AstNode>(self) -> Option<Parse<N>> {
        N::cast(self.syntax_node())?;
        Some(Parse { green: self.green, errors: self.errors, _ty: PhantomData })
    }
}

impl Parse<SourceFile> {
    /// The tree followed by one line per error.
    pub fn debug_dump(&self) -> String {
        let mut buf = format!("{:#?}", self.tree().syntax());
        for error in self.errors() {
            buf.push_str(&format!("error {:?}: {}\n", error.range(), error.message()));
        }
        buf
    }

    /// Applies `edit` to the text of this file and parses the result,
    /// reusing as much of the old tree as possible.
    ///
    /// # Panics
    ///
    /// If the deleted range of `edit` is not inside the file.
    #[track_caller]
    pub fn reparse(&self, edit: &Indel) -> Self {
        if edit.is_noop() {
            return self.clone();
        }
        let root = self.syntax_node();
        if let Some((green, errors)) =
            reparsing::incremental_reparse(&root, edit, self.stored_errors())
        {
            return Self::new(green, errors);
        }

        debug!("full reparse for edit at {:?}", edit.delete);
        let mut text = root.to_string();
        edit.apply(&mut text);
        crate::source_file(&text)
    }
}
