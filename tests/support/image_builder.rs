//! Builds minimal managed PE images for tests: one `.text` section carrying a
//! CLI header and a metadata root with the five standard streams.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const NOT_PUBLIC: u32 = 0x0;
pub const PUBLIC: u32 = 0x1;
pub const NESTED_PUBLIC: u32 = 0x2;
pub const NESTED_PRIVATE: u32 = 0x3;

const FILE_ALIGNMENT: u32 = 0x200;
const SECTION_ALIGNMENT: u32 = 0x2000;
const TEXT_RVA: u32 = 0x2000;
const CLI_HEADER_SIZE: u32 = 72;
const PE_OFFSET: usize = 0x80;

#[derive(Clone, Debug)]
struct TypeRow {
    namespace: String,
    name: String,
    flags: u32,
}

#[derive(Clone, Debug)]
pub struct ImageBuilder {
    module_name: String,
    types: Vec<TypeRow>,
    type_refs: Vec<(String, String)>,
    wide_strings: bool,
    extra_data: bool,
    pe32_plus: bool,
}

impl ImageBuilder {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            types: vec![TypeRow {
                namespace: String::new(),
                name: "<Module>".into(),
                flags: NOT_PUBLIC,
            }],
            type_refs: Vec::new(),
            wide_strings: false,
            extra_data: false,
            pe32_plus: false,
        }
    }

    pub fn public_type(self, namespace: &str, name: &str) -> Self {
        self.type_with_flags(namespace, name, PUBLIC)
    }

    pub fn internal_type(self, namespace: &str, name: &str) -> Self {
        self.type_with_flags(namespace, name, NOT_PUBLIC)
    }

    pub fn nested_public_type(self, name: &str) -> Self {
        self.type_with_flags("", name, NESTED_PUBLIC)
    }

    pub fn type_with_flags(mut self, namespace: &str, name: &str, flags: u32) -> Self {
        self.types.push(TypeRow {
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags,
        });
        self
    }

    pub fn type_ref(mut self, namespace: &str, name: &str) -> Self {
        self.type_refs
            .push((namespace.to_string(), name.to_string()));
        self
    }

    pub fn wide_string_heap(mut self) -> Self {
        self.wide_strings = true;
        self
    }

    pub fn extra_data(mut self) -> Self {
        self.extra_data = true;
        self
    }

    pub fn pe32_plus(mut self) -> Self {
        self.pe32_plus = true;
        self
    }

    pub fn write_to(&self, path: &Path) {
        fs::write(path, self.build()).expect("write assembly image");
    }

    /// Full PE image bytes.
    pub fn build(&self) -> Vec<u8> {
        let metadata = self.metadata();
        let mut text = Vec::new();
        put_u32(&mut text, CLI_HEADER_SIZE);
        put_u16(&mut text, 2);
        put_u16(&mut text, 5);
        put_u32(&mut text, TEXT_RVA + CLI_HEADER_SIZE);
        put_u32(&mut text, metadata.len() as u32);
        put_u32(&mut text, 1);
        put_u32(&mut text, 0);
        text.resize(CLI_HEADER_SIZE as usize, 0);
        text.extend_from_slice(&metadata);

        let virtual_size = text.len() as u32;
        let raw_size = virtual_size.next_multiple_of(FILE_ALIGNMENT);

        let mut image = vec![0u8; PE_OFFSET];
        image[0] = b'M';
        image[1] = b'Z';
        image[0x3C..0x40].copy_from_slice(&(PE_OFFSET as u32).to_le_bytes());

        image.extend_from_slice(b"PE\0\0");
        let optional_size: u16 = if self.pe32_plus { 240 } else { 224 };
        put_u16(&mut image, if self.pe32_plus { 0x8664 } else { 0x014C });
        put_u16(&mut image, 1);
        put_u32(&mut image, 0);
        put_u32(&mut image, 0);
        put_u32(&mut image, 0);
        put_u16(&mut image, optional_size);
        put_u16(&mut image, 0x2022);

        let image_size = TEXT_RVA + virtual_size.next_multiple_of(SECTION_ALIGNMENT);
        put_u16(&mut image, if self.pe32_plus { 0x020B } else { 0x010B });
        image.extend_from_slice(&[8, 0]);
        put_u32(&mut image, raw_size);
        put_u32(&mut image, 0);
        put_u32(&mut image, 0);
        put_u32(&mut image, 0);
        put_u32(&mut image, TEXT_RVA);
        if self.pe32_plus {
            put_u64(&mut image, 0x1_8000_0000);
        } else {
            put_u32(&mut image, 0);
            put_u32(&mut image, 0x1000_0000);
        }
        put_u32(&mut image, SECTION_ALIGNMENT);
        put_u32(&mut image, FILE_ALIGNMENT);
        for version in [4u16, 0, 0, 0, 4, 0] {
            put_u16(&mut image, version);
        }
        put_u32(&mut image, 0);
        put_u32(&mut image, image_size);
        put_u32(&mut image, FILE_ALIGNMENT);
        put_u32(&mut image, 0);
        put_u16(&mut image, 3);
        put_u16(&mut image, 0x8540);
        for value in [0x10_0000u64, 0x1000, 0x10_0000, 0x1000] {
            if self.pe32_plus {
                put_u64(&mut image, value);
            } else {
                put_u32(&mut image, value as u32);
            }
        }
        put_u32(&mut image, 0);
        put_u32(&mut image, 16);
        for index in 0..16 {
            if index == 14 {
                put_u32(&mut image, TEXT_RVA);
                put_u32(&mut image, CLI_HEADER_SIZE);
            } else {
                put_u64(&mut image, 0);
            }
        }

        image.extend_from_slice(b".text\0\0\0");
        put_u32(&mut image, virtual_size);
        put_u32(&mut image, TEXT_RVA);
        put_u32(&mut image, raw_size);
        put_u32(&mut image, FILE_ALIGNMENT);
        put_u32(&mut image, 0);
        put_u32(&mut image, 0);
        put_u16(&mut image, 0);
        put_u16(&mut image, 0);
        put_u32(&mut image, 0x6000_0020);

        assert!(image.len() <= FILE_ALIGNMENT as usize);
        image.resize(FILE_ALIGNMENT as usize, 0);
        image.extend_from_slice(&text);
        image.resize((FILE_ALIGNMENT + raw_size) as usize, 0);
        image
    }

    /// Metadata root bytes only.
    pub fn metadata(&self) -> Vec<u8> {
        let mut strings = StringHeap::default();
        let module_name = strings.intern(&self.module_name);
        let type_refs: Vec<(u32, u32)> = self
            .type_refs
            .iter()
            .map(|(namespace, name)| (strings.intern(name), strings.intern(namespace)))
            .collect();
        let type_defs: Vec<(u32, u32, u32)> = self
            .types
            .iter()
            .map(|row| (row.flags, strings.intern(&row.name), strings.intern(&row.namespace)))
            .collect();
        let strings = strings.finish();

        let mut heap_sizes = 0u8;
        if self.wide_strings {
            heap_sizes |= 0x01;
        }
        if self.extra_data {
            heap_sizes |= 0x40;
        }

        let mut tables = Vec::new();
        put_u32(&mut tables, 0);
        tables.extend_from_slice(&[2, 0, heap_sizes, 1]);
        let mut valid = 0b101u64;
        if !type_refs.is_empty() {
            valid |= 0b010;
        }
        put_u64(&mut tables, valid);
        put_u64(&mut tables, 0);
        put_u32(&mut tables, 1);
        if !type_refs.is_empty() {
            put_u32(&mut tables, type_refs.len() as u32);
        }
        put_u32(&mut tables, type_defs.len() as u32);
        if self.extra_data {
            put_u32(&mut tables, 0);
        }

        let put_string = |out: &mut Vec<u8>, index: u32| {
            if self.wide_strings {
                put_u32(out, index);
            } else {
                put_u16(out, index as u16);
            }
        };

        put_u16(&mut tables, 0);
        put_string(&mut tables, module_name);
        put_u16(&mut tables, 1);
        put_u16(&mut tables, 0);
        put_u16(&mut tables, 0);

        for (name, namespace) in &type_refs {
            // ResolutionScope: AssemblyRef row 1.
            put_u16(&mut tables, (1 << 2) | 2);
            put_string(&mut tables, *name);
            put_string(&mut tables, *namespace);
        }

        for (flags, name, namespace) in &type_defs {
            put_u32(&mut tables, *flags);
            put_string(&mut tables, *name);
            put_string(&mut tables, *namespace);
            put_u16(&mut tables, 0);
            put_u16(&mut tables, 1);
            put_u16(&mut tables, 1);
        }
        tables.resize(tables.len().next_multiple_of(4), 0);

        let guid = vec![0x11u8; 16];
        let empty_heap = [0u8; 4];
        let version = b"v4.0.30319\0\0";
        let streams: [(&[u8], &[u8]); 5] = [
            (b"#~", &tables),
            (b"#Strings", &strings),
            (b"#US", &empty_heap),
            (b"#GUID", &guid),
            (b"#Blob", &empty_heap),
        ];

        let header_len = 16
            + version.len()
            + 4
            + streams
                .iter()
                .map(|(name, _)| 8 + (name.len() + 1).next_multiple_of(4))
                .sum::<usize>();

        let mut root = Vec::new();
        put_u32(&mut root, 0x424A_5342);
        put_u16(&mut root, 1);
        put_u16(&mut root, 1);
        put_u32(&mut root, 0);
        put_u32(&mut root, version.len() as u32);
        root.extend_from_slice(version);
        put_u16(&mut root, 0);
        put_u16(&mut root, streams.len() as u16);

        let mut offset = header_len;
        for (name, data) in &streams {
            put_u32(&mut root, offset as u32);
            put_u32(&mut root, data.len() as u32);
            root.extend_from_slice(name);
            let padded = (name.len() + 1).next_multiple_of(4);
            root.resize(root.len() + padded - name.len(), 0);
            offset += data.len();
        }
        assert_eq!(root.len(), header_len);
        for (_, data) in &streams {
            root.extend_from_slice(data);
        }
        root
    }
}

#[derive(Default)]
struct StringHeap {
    bytes: Vec<u8>,
}

impl StringHeap {
    fn intern(&mut self, value: &str) -> u32 {
        if self.bytes.is_empty() {
            self.bytes.push(0);
        }
        if value.is_empty() {
            return 0;
        }
        let index = self.bytes.len() as u32;
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.push(0);
        index
    }

    fn finish(mut self) -> Vec<u8> {
        if self.bytes.is_empty() {
            self.bytes.push(0);
        }
        self.bytes.resize(self.bytes.len().next_multiple_of(4), 0);
        self.bytes
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}
